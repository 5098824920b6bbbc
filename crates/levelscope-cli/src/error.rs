use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Upstream and data failures are not errors here: they are reported in the
/// `{"ok": false}` response body with exit code 3.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] levelscope_analysis::ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
