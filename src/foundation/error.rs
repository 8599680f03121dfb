pub type MotionResult<T> = Result<T, MotionError>;

#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("engine load failure: {0}")]
    EngineLoad(String),

    #[error("route error: {0}")]
    Route(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn engine_load(msg: impl Into<String>) -> Self {
        Self::EngineLoad(msg.into())
    }

    pub fn route(msg: impl Into<String>) -> Self {
        Self::Route(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            MotionError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            MotionError::engine_load("x")
                .to_string()
                .contains("engine load failure:")
        );
        assert!(MotionError::route("x").to_string().contains("route error:"));
        assert!(
            MotionError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = MotionError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: MotionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, MotionError::Serde(_)));
    }
}
