use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            title: "Tessera".to_string(),
        }
    }
}

/// Engine configuration, loadable from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    /// Framebuffer clear color at startup.
    pub clear_color: Rgba,
    /// Scene selected when the loop starts.
    pub initial_scene: i32,
    pub vsync: bool,
    /// `env_logger` filter directives; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: Rgba::white(),
            initial_scene: 0,
            vsync: true,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("failed to parse engine config")?;
        anyhow::ensure!(
            config.window.width > 0 && config.window.height > 0,
            "window size must be non-zero (got {}x{})",
            config.window.width,
            config.window.height
        );
        anyhow::ensure!(config.clear_color.is_finite(), "clear color must be finite");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.window.width, 960);
        assert_eq!(config.window.title, "Tessera");
        assert_eq!(config.clear_color, Rgba::white());
        assert!(config.vsync);
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = EngineConfig::from_json(
            r#"{ "window": { "title": "demo" }, "initial_scene": 1,
                 "clear_color": { "r": 0.2, "g": 0.3, "b": 0.4, "a": 1.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.height, 540);
        assert_eq!(config.initial_scene, 1);
        assert_eq!(config.clear_color, Rgba::new(0.2, 0.3, 0.4, 1.0));
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "window": { "width": 0 } }"#).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(EngineConfig::from_json("{ window: ").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::load("/nonexistent/tessera.json").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tessera.json"));
    }
}
