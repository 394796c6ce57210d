//! Editor configuration.

use crate::blueprint::DEFAULT_MAX_UPLOAD_BYTES;
use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::viewport::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_STEP, Viewport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower zoom bound, applied to every zoom change.
    pub min_zoom: f64,
    /// Upper zoom bound, applied to every zoom change.
    pub max_zoom: f64,
    /// Factor for one zoom in/out step.
    pub zoom_step: f64,
    /// Snapshots kept per undo/redo stack.
    pub history_depth: usize,
    /// Offset applied to pasted objects, in document pixels.
    pub paste_offset: f64,
    /// Pointer hit tolerance, in screen pixels.
    pub hit_tolerance: f64,
    /// Largest blueprint upload accepted, in bytes.
    pub max_upload_bytes: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            history_depth: DEFAULT_HISTORY_DEPTH,
            paste_offset: 20.0,
            hit_tolerance: 4.0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the config for inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "minZoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom >= self.min_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "maxZoom ({}) must be at least minZoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.zoom_step > 1.0 && self.zoom_step.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoomStep must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.hit_tolerance < 0.0 {
            return Err(ConfigError::Invalid("hitTolerance must not be negative".to_string()));
        }
        Ok(())
    }

    /// Build a viewport honouring these zoom settings.
    pub fn viewport(&self) -> Viewport {
        Viewport::with_bounds(self.min_zoom, self.max_zoom, self.zoom_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.min_zoom - 0.25).abs() < f64::EPSILON);
        assert!((config.max_zoom - 5.0).abs() < f64::EPSILON);
        assert!((config.paste_offset - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"historyDepth": 10, "maxZoom": 8}"#).unwrap();
        assert_eq!(config.history_depth, 10);
        assert!((config.max_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.zoom_step - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = EditorConfig::from_json(r#"{"minZoom": 4, "maxZoom": 2}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_step_rejected() {
        let result = EditorConfig::from_json(r#"{"zoomStep": 1.0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pasteOffset": 10}}"#).unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert!((config.paste_offset - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_viewport_uses_bounds() {
        let config = EditorConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            ..EditorConfig::default()
        };
        let mut viewport = config.viewport();
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert!((viewport.zoom - 2.0).abs() < f64::EPSILON);
    }
}
