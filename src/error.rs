use thiserror::Error;

/// Errors raised by the per-fiber analysis core.
///
/// These are always caller/input defects; the computation itself is
/// deterministic and side-effect free.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("unknown centering strategy '{0}' (expected 'ssd' or 'ec')")]
    UnknownStrategy(String),

    #[error("unknown window kind '{0}' (expected 'ec', 'fsd', 'ssd' or 'err')")]
    UnknownWindowKind(String),

    #[error("fiber has {len} nodes; at least {required} are needed")]
    TooShort { len: usize, required: usize },

    #[error("fiber has no EC potentials")]
    Empty,

    #[error("fiber has no finite values to compare")]
    NoFiniteValues,

    #[error("window [{lower}, {upper}) is outside the fiber's {len} nodes")]
    WindowOutOfBounds { lower: isize, upper: usize, len: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let exit_code = match err {
            AnalysisError::UnknownStrategy(_) | AnalysisError::UnknownWindowKind(_) => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_errors_map_to_exit_codes() {
        let usage: AppError = AnalysisError::UnknownStrategy("max".to_string()).into();
        assert_eq!(usage.exit_code(), 2);
        assert!(usage.message().contains("'max'"));

        let bounds: AppError =
            AnalysisError::WindowOutOfBounds { lower: -2, upper: 9, len: 5 }.into();
        assert_eq!(bounds.exit_code(), 4);
        assert_eq!(bounds.to_string(), "window [-2, 9) is outside the fiber's 5 nodes");
    }
}
