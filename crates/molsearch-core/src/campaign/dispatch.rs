use super::params::Campaign;
use super::partition::{AggregateRoles, BinaryRoles, ReactRoles, ScanRoles, TernaryRoles};
use crate::engine::error::EngineError;
use crate::engine::scan;
use crate::engine::traits::{AggregationEngine, Optimiser, OrientationGenerator, ReactionEngine};
use crate::method::MethodDescriptor;
use crate::models::Molecule;
use std::time::Instant;
use tracing::info;

/// Multiple of the covalent contact distance within which a constrained
/// reaction site must start.
pub const PROXIMITY_FACTOR: f64 = 2.3;

/// Adapts a validated campaign to exactly one engine invocation.
///
/// The dispatcher owns no policy beyond role partitioning and picking the
/// engine; validation has already happened and the engines do the chemistry.
/// Start, end, and elapsed wall-clock time are logged around every call.
pub struct Dispatcher<'a> {
    pub aggregation: &'a dyn AggregationEngine,
    pub reaction: &'a dyn ReactionEngine,
    pub bond_guesser: &'a dyn OrientationGenerator,
    pub optimiser: &'a dyn Optimiser,
}

impl Dispatcher<'_> {
    pub fn dispatch(
        &self,
        campaign: &Campaign,
        molecules: &[Molecule],
        method: &MethodDescriptor,
    ) -> Result<(), EngineError> {
        let label = campaign.mode_label();
        info!("starting {label} run with {} molecules", molecules.len());
        let started = Instant::now();

        let result = match campaign {
            Campaign::Aggregate(params) => {
                let roles = AggregateRoles::partition(molecules);
                self.aggregation.solvate(
                    roles.seeds,
                    roles.monomer,
                    params.aggregate_size,
                    params.orientations,
                    method,
                    params.max_seeds,
                )
            }
            Campaign::BinaryAggregate(params) => {
                let roles = BinaryRoles::partition(molecules);
                self.aggregation.aggregate_binary(
                    roles.group_a,
                    roles.group_b,
                    params.size_a,
                    params.size_b,
                    params.orientations,
                    method,
                    params.max_seeds,
                    params.first_pathway,
                    params.pathway_count,
                )
            }
            Campaign::TernaryAggregate(params) => {
                let roles = TernaryRoles::partition(molecules);
                self.aggregation.aggregate_ternary(
                    roles.group_a,
                    roles.group_b,
                    roles.group_c,
                    params.size_a,
                    params.size_b,
                    params.size_c,
                    params.orientations,
                    method,
                    params.max_seeds,
                )
            }
            Campaign::React(params) => {
                let roles = ReactRoles::partition(molecules, params.site);
                self.reaction.explore(
                    roles.reactant_one,
                    roles.reactant_two,
                    params.gamma_min,
                    params.gamma_max,
                    params.orientations,
                    method,
                    roles.site,
                    PROXIMITY_FACTOR,
                )
            }
            Campaign::ScanBond(params) => {
                let roles = ScanRoles::partition(molecules, params.pair);
                scan::run(
                    roles.first,
                    roles.second,
                    roles.site,
                    params.orientations,
                    method,
                    self.bond_guesser,
                    self.optimiser,
                )
            }
        };

        info!(
            "finished {label} run in {:.3} s",
            started.elapsed().as_secs_f64()
        );
        result
    }
}
