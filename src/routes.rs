/// Prebuilt app artifact served as a static download
pub const DOWNLOAD_PATH: &str = "/app-release.apk";
pub const DOWNLOAD_FILENAME: &str = "FMCG-AI-Studio.apk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    TrendForecasting,
    ProductIdeation,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::TrendForecasting, Route::ProductIdeation];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::TrendForecasting => "/trend-forecasting",
            Route::ProductIdeation => "/product-ideation",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Dashboard",
            Route::TrendForecasting => "Trend Forecasting",
            Route::ProductIdeation => "Product Ideation",
        }
    }

    /// Match a location path; a trailing slash or query string is ignored
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// The landing page renders without the header bar
    pub fn shows_header(&self) -> bool {
        !matches!(self, Route::Home)
    }
}
