use thiserror::Error;

/// Startup-time configuration problems. Everything that can go wrong after
/// startup is handled in place (skip and log), never through this type.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("sweep interval must be at least 1 second")]
    ZeroInterval,

    #[error("max storage must be at least 1 MB")]
    ZeroStorage,

    #[error("storage warn percent must be in 1..=100, got {0}")]
    WarnPercentOutOfRange(u64),

    #[error("upload root `{0}` exists but is not a directory")]
    RootNotADirectory(String),
}
