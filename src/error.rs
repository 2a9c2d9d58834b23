pub type FlameResult<T> = Result<T, FlameError>;

#[derive(thiserror::Error, Debug)]
pub enum FlameError {
    /// A flame, xform or palette violates a runtime invariant checked at setup.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("output error: {0}")]
    Output(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FlameError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

impl From<serde_json::Error> for FlameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Scene(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(FlameError::invalid("x")
            .to_string()
            .contains("invalid configuration:"));
        assert!(FlameError::scene("x").to_string().contains("scene error:"));
        assert!(FlameError::output("x").to_string().contains("output error:"));
    }

    #[test]
    fn io_preserves_source() {
        let err = FlameError::from(std::io::Error::other("boom"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_become_scene_errors() {
        let err: FlameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FlameError::Scene(_)));
    }
}
