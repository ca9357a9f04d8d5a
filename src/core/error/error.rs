use thiserror::Error;

/// Errors raised by the render core.
///
/// Only `Config` and `Scene` errors are meant to reach the driver: the
/// session turns device and resource failures into state transitions and
/// status text.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Config(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("out of memory: {0}")]
    Resource(String),
    #[error("scene error: {0}")]
    Scene(String),
    #[error("invalid session state: {0}")]
    State(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub fn config(msg: &str) -> Self {
        RenderError::Config(msg.to_string())
    }

    pub fn device(msg: &str) -> Self {
        RenderError::Device(msg.to_string())
    }

    pub fn scene(msg: &str) -> Self {
        RenderError::Scene(msg.to_string())
    }

    pub fn state(msg: &str) -> Self {
        RenderError::State(msg.to_string())
    }

    /// `true` for errors that must stop the process before a session starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RenderError::Config(_) | RenderError::Scene(_) | RenderError::Json(_)
        )
    }
}
