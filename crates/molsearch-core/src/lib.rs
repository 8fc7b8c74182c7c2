//! # molsearch Core Library
//!
//! A structure-search library for molecular aggregation, reaction-pathway
//! exploration, and bond-distance scans.
//!
//! ## Architectural Philosophy
//!
//! The library separates decision-making from chemistry:
//!
//! - **[`models`]: The Foundation.** The immutable [`models::Molecule`]
//!   geometry type, XYZ parsing, and the covalent radius table.
//!
//! - **[`campaign`]: The Decision Layer.** Mode selection, fail-fast
//!   parameter validation, deterministic role partitioning, and dispatch of
//!   exactly one engine call per run. This layer performs no chemistry.
//!
//! - **[`engine`]: The Search Engines.** Aggregation growth, reactive-pathway
//!   exploration, and bond scans, built against injectable trait seams
//!   (optimiser, orientation sampler, geometry selector) so the search
//!   bookkeeping is testable without a quantum-chemistry backend.
//!
//! The [`method::MethodDescriptor`] is constructed once per run from
//! validated inputs and threaded read-only through every engine call.

pub mod campaign;
pub mod engine;
pub mod method;
pub mod models;
pub mod utils;
