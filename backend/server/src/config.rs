use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub predict_url: String,
    pub forecast_url: String,
    pub upload_dir: String,
    pub model_dir: String,
    pub predict_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8000"),
            allowed_origins: split_list(&try_load::<String>(
                "ALLOWED_ORIGINS",
                "http://localhost:3000",
            )),
            predict_url: try_load("PREDICT_URL", "http://localhost:8001"),
            forecast_url: try_load("FORECAST_URL", "http://localhost:8001/predict"),
            upload_dir: try_load("UPLOAD_DIR", "uploads"),
            model_dir: try_load("MODEL_DIR", "output"),
            predict_timeout: Duration::from_secs(try_load("PREDICT_TIMEOUT_SECS", "300")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
