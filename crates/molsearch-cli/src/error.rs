use molsearch::campaign::ValidationError;
use molsearch::engine::EngineError;
use molsearch::method::MethodError;
use molsearch::models::XyzError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load input '{path}': {source}", path = path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: XyzError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
