//! Render configuration, loaded from TOML

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How carriage returns count when resolving the line a caret sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineBreaks {
    /// Every `'\n'` and every `'\r'` starts a new line, so `"\r\n"` is two breaks
    #[default]
    Independent,
    /// `"\r\n"` is a single break; lone `'\r'` and `'\n'` still break
    CollapseCrLf,
}

/// Tunables for the draw orchestrator and caret rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Opacity applied to the selection color (0.0 to 1.0)
    pub selection_opacity: f32,
    /// Caret bar width in pixels
    pub caret_width: f32,
    /// Line break policy for multi-line caret placement
    pub line_breaks: LineBreaks,
    /// Reprogram the parent's scissor after a child subtree returns
    pub restore_clip_after_child: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            selection_opacity: 0.6,
            caret_width: 1.0,
            line_breaks: LineBreaks::Independent,
            restore_clip_after_child: true,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a config; missing keys keep their defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.selection_opacity) {
            return Err(ConfigError::Invalid(format!(
                "selection_opacity must be within 0.0..=1.0, got {}",
                self.selection_opacity
            )));
        }
        if !(self.caret_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "caret_width must be positive, got {}",
                self.caret_width
            )));
        }
        Ok(())
    }
}
