/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub json_format: bool,
    /// Fallback filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl TracingConfig {
    pub fn with_level(mut self, level: &str) -> Self {
        self.default_filter = format!("{level},scribeway=debug,tower_http=debug");
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_filter: "info,scribeway=debug,tower_http=debug".to_string(),
        }
    }
}
