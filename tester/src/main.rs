//! Manual smoke driver: walks a running backend through every endpoint.
//!
//! ```sh
//! cargo run -p backend &
//! cargo run -p tester
//! ```
use anyhow::Result;
use serde_json::{Value, json};

use cockpit::api::{ApiClient, CsvFile};

const BASE_URL: &str = "http://localhost:8000";

#[tokio::main]
async fn main() -> Result<()> {
    let http = reqwest::Client::new();

    let ping: Value = http
        .get(format!("{BASE_URL}/api/ping"))
        .send()
        .await?
        .json()
        .await?;
    println!("ping: {ping}");

    let hello: Value = http
        .get(format!("{BASE_URL}/api/hello"))
        .send()
        .await?
        .json()
        .await?;
    println!("hello: {hello}");

    let echo: Value = http
        .post(format!("{BASE_URL}/api/echo"))
        .json(&json!({ "message": "hello" }))
        .send()
        .await?
        .json()
        .await?;
    println!("echo: {echo}");

    let reverse: Value = http
        .post(format!("{BASE_URL}/api/reverse"))
        .json(&json!({ "message": "abc" }))
        .send()
        .await?
        .json()
        .await?;
    println!("reverse: {reverse}");

    let client = ApiClient::new(BASE_URL);

    println!("weather: {}", client.weather().await?);

    let files = client.files().await?;
    println!("{} model file(s)", files.len());
    for file in &files {
        println!("  {} ({})", file.name, file.path);
    }

    let csv = CsvFile {
        name: "smoke.csv".to_string(),
        mime: Some("text/csv".to_string()),
        bytes: b"temp,pressure\n20,1.0\n90,4.5\n".to_vec(),
    };

    let uploaded = client.upload(&csv).await?;
    println!("upload: {} ({})", uploaded.filename, uploaded.status);

    match files.first() {
        Some(model) => match client.predict(&csv, &model.path).await {
            Ok(response) => println!("predict: {} label(s)", response.predictions.len()),
            Err(e) => println!("predict failed: {e}"),
        },
        None => println!("predict skipped: no model files"),
    }

    Ok(())
}
