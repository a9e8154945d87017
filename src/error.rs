//! Error types surfaced by the rendering core

use crate::text::FontId;
use crate::widget::WidgetId;
use thiserror::Error;

/// Errors raised while wiring up or running a draw pass.
///
/// Degenerate geometry is not an error: a fully clipped subtree is simply
/// skipped.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required collaborator was never supplied to the builder
    #[error("missing render capability: {0}")]
    MissingCapability(&'static str),

    /// A widget references a font that was never registered
    #[error("font {0:?} is not registered")]
    FontNotFound(FontId),

    /// A widget id does not resolve in its tree
    #[error("widget {0:?} is not in the tree")]
    WidgetNotFound(WidgetId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse render config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid render config: {0}")]
    Invalid(String),
}
