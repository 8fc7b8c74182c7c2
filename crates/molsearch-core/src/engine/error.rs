use crate::models::XyzError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("optimisation of '{name}' failed: {reason}")]
    Optimisation { name: String, reason: String },

    #[error("backend '{backend}' invocation failed: {reason}")]
    BackendInvocation { backend: String, reason: String },

    #[error("backend '{backend}' cannot express a bond-scan directive")]
    ScanUnsupported { backend: String },

    #[error("atom index {index} is out of range for a structure with {atom_count} atoms")]
    AtomIndexOutOfRange { index: usize, atom_count: usize },

    #[error("structure error: {0}")]
    Structure(#[from] XyzError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
