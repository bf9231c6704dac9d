use serde::{Deserialize, Serialize};

use crate::state::gesture::GestureConfig;
use crate::util;

pub const CONFIG_KEY: &str = "app_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the API, with trailing slash.
    pub api_url: String,
    pub page_size: u32,
    /// One of trace, debug, info, warn, error.
    pub log_level: String,
    pub gesture: GestureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://localhost:5001/api/".into(),
            page_size: 5,
            log_level: "info".into(),
            gesture: GestureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Stored overrides from localStorage, defaults for anything missing or unreadable.
    pub fn load() -> Self {
        match util::load_json::<AppConfig>(CONFIG_KEY) {
            Ok(Some(cfg)) => cfg.normalized(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored config");
                Self::default()
            }
        }
    }

    fn normalized(mut self) -> Self {
        if !self.api_url.ends_with('/') {
            self.api_url.push('/');
        }
        if self.page_size == 0 {
            self.page_size = Self::default().page_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"api_url":"http://api.test","gesture":{"min_refresh_ms":500}}"#).unwrap();
        let cfg = cfg.normalized();
        assert_eq!(cfg.api_url, "http://api.test/");
        assert_eq!(cfg.page_size, 5);
        assert_eq!(cfg.gesture.min_refresh_ms, 500);
        assert_eq!(cfg.gesture.commit_threshold, 60.0);
    }

    #[test]
    fn zero_page_size_falls_back() {
        let cfg = AppConfig { page_size: 0, ..AppConfig::default() }.normalized();
        assert_eq!(cfg.page_size, 5);
    }
}
