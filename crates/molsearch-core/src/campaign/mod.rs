//! Campaign selection, validation, role partitioning, and dispatch.
//!
//! This layer turns CLI intent into exactly one validated engine call. It
//! performs no chemistry: the decision flow is mode selection
//! ([`mode::ModeRequest`]), fail-fast parameter and cardinality validation
//! ([`params::Campaign::validate`]), deterministic role partitioning
//! ([`partition`]), and a single dispatch ([`dispatch::Dispatcher`]).

pub mod dispatch;
pub mod mode;
pub mod params;
pub mod partition;
pub mod site;

pub use dispatch::{Dispatcher, PROXIMITY_FACTOR};
pub use mode::ModeRequest;
pub use params::{Campaign, RawParams, ValidationError};
pub use site::SitePair;
