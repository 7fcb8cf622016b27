use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] sectormap_core::CoreError),

    #[error(transparent)]
    Persist(#[from] sectormap_core::PersistError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Persist(_) => 10,
            Self::Serialization(_) => 4,
        }
    }
}
