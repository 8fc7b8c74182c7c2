use super::error::EngineError;
use crate::method::MethodDescriptor;
use crate::models::Molecule;

/// Convergence tightness requested from the single-structure optimiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Loose,
    Normal,
    Tight,
}

/// Outcome of one single-structure optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptOutcome {
    Converged,
    /// The optimiser ran out of cycles; the structure may be worth retrying.
    CycleExceeded,
    Failed,
}

/// The single-structure geometry optimiser.
///
/// Implementations invoke the quantum-chemistry backend named by the method
/// descriptor. On success the molecule's coordinates and energy are updated
/// in place. `directive` is an optional backend-specific input fragment
/// (e.g. a bond-scan block); implementations must reject directives their
/// backend cannot express.
pub trait Optimiser {
    fn optimise(
        &self,
        molecule: &mut Molecule,
        method: &MethodDescriptor,
        convergence: Convergence,
        directive: Option<&str>,
    ) -> Result<OptOutcome, EngineError>;
}

/// Produces trial placements of a fragment around a seed structure.
///
/// Each returned molecule is the combined seed-plus-fragment structure in the
/// concatenated index space, named after `tag`.
pub trait OrientationGenerator {
    fn generate(
        &self,
        tag: &str,
        seed: &Molecule,
        fragment: &Molecule,
        count: usize,
    ) -> Result<Vec<Molecule>, EngineError>;
}

/// Geometry clustering hooks used between optimisation rounds.
pub trait GeometrySelector {
    /// Drops structures that duplicate an earlier entry.
    fn remove_similar(&self, molecules: Vec<Molecule>) -> Vec<Molecule>;

    /// Picks at most `max_seeds` structures to carry into the next cycle.
    fn choose_geometries(&self, molecules: Vec<Molecule>, max_seeds: usize) -> Vec<Molecule>;
}

/// The aggregation search engine: one entry point per aggregation campaign.
pub trait AggregationEngine {
    /// Grows each seed by `aggregate_size` copies of `monomer`.
    #[allow(clippy::too_many_arguments)]
    fn solvate(
        &self,
        seeds: &[Molecule],
        monomer: &Molecule,
        aggregate_size: usize,
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
    ) -> Result<(), EngineError>;

    /// Two-component exhaustive aggregation over addition pathways.
    #[allow(clippy::too_many_arguments)]
    fn aggregate_binary(
        &self,
        group_a: &[Molecule],
        group_b: &[Molecule],
        size_a: usize,
        size_b: usize,
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
        first_pathway: usize,
        pathway_count: usize,
    ) -> Result<(), EngineError>;

    /// Three-component exhaustive aggregation over addition pathways.
    #[allow(clippy::too_many_arguments)]
    fn aggregate_ternary(
        &self,
        group_a: &[Molecule],
        group_b: &[Molecule],
        group_c: &[Molecule],
        size_a: usize,
        size_b: usize,
        size_c: usize,
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
    ) -> Result<(), EngineError>;
}

/// The reactive-pathway search engine.
pub trait ReactionEngine {
    #[allow(clippy::too_many_arguments)]
    fn explore(
        &self,
        reactant_one: &Molecule,
        reactant_two: &Molecule,
        gamma_min: f64,
        gamma_max: f64,
        orientations: usize,
        method: &MethodDescriptor,
        site: Option<crate::campaign::site::SitePair>,
        proximity_factor: f64,
    ) -> Result<(), EngineError>;
}
