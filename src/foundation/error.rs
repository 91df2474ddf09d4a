/// Convenience result type used across bitclock.
pub type BitclockResult<T> = Result<T, BitclockError>;

/// Top-level error taxonomy.
///
/// `Validation` covers structural configuration problems and is always fatal
/// before the first frame is rendered. `Resource` covers unavailable external
/// resources (fonts) that callers are expected to recover from locally.
#[derive(thiserror::Error, Debug)]
pub enum BitclockError {
    /// Invalid configuration or precondition violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An external resource (e.g. a font) could not be resolved.
    #[error("resource unavailable: {0}")]
    Resource(String),

    /// Errors while compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding or writing the output stream.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BitclockError {
    /// Build a [`BitclockError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BitclockError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`BitclockError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BitclockError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_variant_prefix() {
        let e = BitclockError::validation("fps must be non-zero");
        assert_eq!(e.to_string(), "validation error: fps must be non-zero");

        let e = BitclockError::encode("ffmpeg exited");
        assert_eq!(e.to_string(), "encode error: ffmpeg exited");
    }

    #[test]
    fn anyhow_passthrough_preserves_message() {
        let inner = anyhow::anyhow!("disk full");
        let e = BitclockError::from(inner);
        assert_eq!(e.to_string(), "disk full");
    }
}
