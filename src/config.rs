use std::net::SocketAddr;

/// Runtime configuration, read once at startup and passed into `AppState`.
/// Analytics code never touches the process environment directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Static bearer token accepted by the API; stands in for the session layer.
    pub api_token: String,
    /// Trailing window of daily history the series generator produces.
    pub history_days: usize,
    /// Seasonal cycle length used by the smoothing models.
    pub season_length: usize,
    /// Samples per input dimension for the price grid scan.
    pub grid_resolution: usize,
    /// Wall-clock budget for the price grid scan.
    pub grid_deadline_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_token: "dev-token".to_string(),
            history_days: 365,
            season_length: 12,
            grid_resolution: 100,
            grid_deadline_ms: 2000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_addr),
            api_token: std::env::var("API_TOKEN").unwrap_or(defaults.api_token),
            history_days: env_usize("HISTORY_DAYS", defaults.history_days),
            season_length: env_usize("SEASON_LENGTH", defaults.season_length),
            grid_resolution: env_usize("GRID_RESOLUTION", defaults.grid_resolution),
            grid_deadline_ms: std::env::var("GRID_DEADLINE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.grid_deadline_ms),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_token.is_empty() {
            return Err("API_TOKEN must not be empty".to_string());
        }
        if self.season_length < 2 {
            return Err("SEASON_LENGTH must be at least 2".to_string());
        }
        if self.history_days < 2 * self.season_length {
            return Err(format!(
                "HISTORY_DAYS ({}) must cover at least two seasonal cycles ({})",
                self.history_days,
                2 * self.season_length
            ));
        }
        if self.grid_resolution < 2 {
            return Err("GRID_RESOLUTION must be at least 2".to_string());
        }
        Ok(())
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
