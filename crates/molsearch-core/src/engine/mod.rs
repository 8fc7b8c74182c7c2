//! Generation engines and the trait seams the campaign layer calls through.
//!
//! The traits in [`traits`] are the contract between the decision layer and
//! the chemistry: the dispatcher only ever sees those signatures, which is
//! also what makes the campaign layer testable with spy engines.

pub mod aggregator;
pub mod cluster;
pub mod error;
pub mod reactor;
pub mod scan;
pub mod tabu;
pub mod traits;

pub use error::EngineError;
