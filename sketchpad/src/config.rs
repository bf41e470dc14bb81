//! # Configuration
//!
//! Session defaults, loadable from a TOML file. Every field is optional in
//! the file; absent fields take the built-in defaults. A missing file is
//! fine; a malformed one is an error the binary surfaces.

use std::path::{Path, PathBuf};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Tool key, as accepted by the tool registry.
    pub tool: String,
    pub stroke_width: f32,
    /// 0 to 1.
    pub opacity: f32,
    /// `#rrggbb`.
    pub stroke_color: String,
    /// `#rrggbb`.
    pub background: String,
    /// Square workspace side, pixels; clamped by the workspace policy.
    pub workspace_extent: u32,
    /// Initial display surface size, pixels.
    pub display_width: u32,
    pub display_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tool: "brush".into(),
            stroke_width: 6.0,
            opacity: 1.0,
            stroke_color: "#1d1d1d".into(),
            background: "#ffffff".into(),
            workspace_extent: 2400,
            display_width: 1280,
            display_height: 800,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SessionConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
    /// Read from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
    /// Per-user config location, if the platform exposes one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("sketchpad").join("sketchpad.toml"))
    }
}

#[cfg(test)]
mod test {
    use super::SessionConfig;

    #[test]
    fn absent_fields_take_defaults() {
        let config = SessionConfig::from_toml("tool = \"marker\"\nopacity = 0.5\n").unwrap();
        assert_eq!(config.tool, "marker");
        assert_eq!(config.opacity, 0.5);
        assert_eq!(config.workspace_extent, SessionConfig::default().workspace_extent);
    }
    #[test]
    fn malformed_file_is_an_error() {
        assert!(SessionConfig::from_toml("tool = [nonsense").is_err());
    }
    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string(&SessionConfig::default()).unwrap();
        assert_eq!(
            SessionConfig::from_toml(&text).unwrap(),
            SessionConfig::default()
        );
    }
}
