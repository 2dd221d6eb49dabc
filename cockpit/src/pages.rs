//! Page and tab inventory, kept host-testable.
//!
//! Pages dispatch as a tagged variant over their identifiers, one handler
//! per variant, instead of a retained component tree.
use crate::game::MatchingGame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Main,
    Dashboard,
    ModelViewer,
    TimeSeries,
    Analysis,
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Main => "/",
            Route::Dashboard => "/dashboard",
            Route::ModelViewer => "/model",
            Route::TimeSeries => "/timeseries",
            Route::Analysis => "/test",
            Route::NotFound => "/404",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Main => "QMS",
            Route::Dashboard => "QMS Dashboard",
            Route::ModelViewer => "Model Viewer",
            Route::TimeSeries => "Time Series",
            Route::Analysis => "Analysis Result",
            Route::NotFound => "Page not found",
        }
    }

    /// Unknown paths land on the 404 page.
    pub fn of_path(path: &str) -> Route {
        Route::all()
            .iter()
            .copied()
            .find(|route| route.path() == path)
            .unwrap_or(Route::NotFound)
    }

    pub fn all() -> &'static [Route] {
        &[
            Route::Main,
            Route::Dashboard,
            Route::ModelViewer,
            Route::TimeSeries,
            Route::Analysis,
            Route::NotFound,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Performance,
    Distribution,
    Importance,
    Ranges,
    Visualizations,
}

impl DashboardTab {
    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Performance => "Performance",
            DashboardTab::Distribution => "Distribution",
            DashboardTab::Importance => "Importance",
            DashboardTab::Ranges => "Ranges",
            DashboardTab::Visualizations => "Visualizations",
        }
    }

    pub fn all() -> &'static [DashboardTab] {
        &[
            DashboardTab::Performance,
            DashboardTab::Distribution,
            DashboardTab::Importance,
            DashboardTab::Ranges,
            DashboardTab::Visualizations,
        ]
    }
}

/// The dashboard shell: static tabs, one active at a time.
#[derive(Debug, Default)]
pub struct Dashboard {
    active: DashboardTab,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> DashboardTab {
        self.active
    }

    pub fn select(&mut self, tab: DashboardTab) {
        self.active = tab;
    }

    /// One panel description per tab; content is static in the prototype.
    pub fn panel(&self) -> &'static str {
        match self.active {
            DashboardTab::Performance => "Model accuracy and error rates over recent runs",
            DashboardTab::Distribution => "Distribution of quality labels across the dataset",
            DashboardTab::Importance => "Feature importance ranking for the active model",
            DashboardTab::Ranges => "Acceptable sensor ranges per production line",
            DashboardTab::Visualizations => "Saved plots from the latest training run",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NotFoundPage {
    pub code: u16,
    pub title: &'static str,
    pub description: &'static str,
    pub hint: &'static str,
}

impl NotFoundPage {
    pub fn new() -> Self {
        Self {
            code: 404,
            title: "Page not found",
            description: "The page you requested does not exist or may have been removed.",
            hint: "Oops! We could not find the page you were looking for.",
        }
    }
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure-state screen: the error message plus the matching game as a
/// distraction while the user decides to reload.
#[derive(Debug)]
pub struct FailurePage {
    message: String,
    pub game: MatchingGame,
}

impl FailurePage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            game: MatchingGame::default(),
        }
    }

    pub fn headline(&self) -> &'static str {
        "Oops! Loading Failed"
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn invitation(&self) -> &'static str {
        "Let's play a game while we fix this!"
    }

    pub fn completion_message(&self) -> Option<&'static str> {
        self.game
            .is_complete()
            .then_some("Great job! You matched all pairs. Try reloading now!")
    }
}
