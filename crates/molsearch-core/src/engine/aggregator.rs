use super::error::EngineError;
use super::traits::{
    AggregationEngine, Convergence, GeometrySelector, OptOutcome, Optimiser, OrientationGenerator,
};
use crate::method::MethodDescriptor;
use crate::models::Molecule;
use itertools::Itertools;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Maximum rounds of block optimisation per seed before the remaining
/// cycle-exceeded structures are abandoned.
const BLOCK_OPTIMISATION_ROUNDS: usize = 10;

const COMPONENT_LABELS: [&str; 3] = ["a", "b", "c"];

/// Checks for a user-placed `stop`/`STOP` file in `dir`.
///
/// Dropping such a file is the supported way to halt a long aggregation run
/// between steps without killing the process.
pub fn stop_requested_in(dir: &Path) -> bool {
    dir.join("stop").exists() || dir.join("STOP").exists()
}

pub fn stop_requested() -> bool {
    stop_requested_in(Path::new("."))
}

/// Identifier for a growing aggregate, tracking how many monomers of each
/// component label it contains, e.g. `ag_a_002_b_001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateId {
    counts: Vec<(&'static str, usize)>,
}

impl AggregateId {
    pub fn new(component_count: usize) -> Self {
        debug_assert!(component_count <= COMPONENT_LABELS.len());
        Self {
            counts: COMPONENT_LABELS[..component_count]
                .iter()
                .map(|label| (*label, 0))
                .collect(),
        }
    }

    /// Records one more monomer of the given component.
    pub fn bump(&mut self, label: &str) {
        if let Some(entry) = self.counts.iter_mut().find(|(l, _)| *l == label) {
            entry.1 += 1;
        }
    }
}

impl fmt::Display for AggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ag")?;
        for (label, count) in &self.counts {
            write!(f, "_{label}_{count:03}")?;
        }
        Ok(())
    }
}

/// The aggregation search engine.
///
/// Owns no chemistry itself: orientation generation, optimisation, and
/// geometry selection are injected, which keeps the growth bookkeeping
/// testable with stand-ins.
pub struct Aggregator<'a> {
    sampler: &'a dyn OrientationGenerator,
    optimiser: &'a dyn Optimiser,
    selector: &'a dyn GeometrySelector,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        sampler: &'a dyn OrientationGenerator,
        optimiser: &'a dyn Optimiser,
        selector: &'a dyn GeometrySelector,
    ) -> Self {
        Self {
            sampler,
            optimiser,
            selector,
        }
    }

    /// Adds one monomer to every seed and returns the selected next-cycle
    /// seeds.
    ///
    /// Per seed: generate trial orientations, then run block optimisation at
    /// loose convergence, requeueing cycle-exceeded structures (deduplicated
    /// between rounds). The converged pool is clustered down to `max_seeds`
    /// and re-optimised at normal convergence.
    fn add_one(
        &self,
        tag: &str,
        seeds: &[Molecule],
        monomer: &Molecule,
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
    ) -> Result<Vec<Molecule>, EngineError> {
        info!("there are {} seed molecules", seeds.len());
        let mut optimised = Vec::new();

        for (seed_index, seed) in seeds.iter().enumerate() {
            if stop_requested() {
                info!("stop file found, halting add_one");
                return Ok(optimised);
            }
            debug!("seed {seed_index}: generating orientations");
            let seed_tag = format!("{tag}_{seed_index:03}");
            let mut pending = self
                .sampler
                .generate(&seed_tag, seed, monomer, orientations)?;
            debug!("orientations are made");

            for round in 0..BLOCK_OPTIMISATION_ROUNDS {
                if pending.is_empty() {
                    break;
                }
                info!(
                    "round {} of block optimisation with {} structures",
                    round + 1,
                    pending.len()
                );
                let mut cycle_exceeded = Vec::new();
                for mut candidate in pending {
                    match self
                        .optimiser
                        .optimise(&mut candidate, method, Convergence::Loose, None)?
                    {
                        OptOutcome::Converged => optimised.push(candidate),
                        OptOutcome::CycleExceeded => cycle_exceeded.push(candidate),
                        OptOutcome::Failed => {}
                    }
                }
                pending = self.selector.remove_similar(cycle_exceeded);
            }
        }

        if optimised.len() < 2 {
            return Ok(optimised);
        }

        info!("clustering {} optimised structures", optimised.len());
        let selected = self.selector.choose_geometries(optimised, max_seeds);
        let mut kept = Vec::with_capacity(selected.len());
        for mut candidate in selected {
            if self
                .optimiser
                .optimise(&mut candidate, method, Convergence::Normal, None)?
                == OptOutcome::Converged
            {
                kept.push(candidate);
            }
        }
        Ok(kept)
    }

    /// Runs every addition pathway for a multi-component aggregate.
    ///
    /// Each group contributes its first molecule as the component geometry,
    /// repeated `size` times in the monomer pool. Distinct orderings of the
    /// pool are the pathways; `first_pathway`/`pathway_count` select a window
    /// of them so a broken run can be restarted where it stopped
    /// (`pathway_count == 0` means "to the end").
    #[allow(clippy::too_many_arguments)]
    fn pathway_aggregate(
        &self,
        groups: &[&[Molecule]],
        sizes: &[usize],
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
        first_pathway: usize,
        pathway_count: usize,
    ) -> Result<(), EngineError> {
        debug_assert_eq!(groups.len(), sizes.len());
        if stop_requested() {
            info!("stop file found, skipping pathway aggregation");
            return Ok(());
        }

        let mut pool: Vec<(usize, &Molecule)> = Vec::new();
        for (component, (group, size)) in groups.iter().zip(sizes).enumerate() {
            let representative = &group[0];
            for _ in 0..*size {
                pool.push((component, representative));
            }
        }

        let pathways: Vec<Vec<(usize, &Molecule)>> = pool
            .iter()
            .copied()
            .permutations(pool.len())
            .unique_by(|pathway| pathway.iter().map(|(c, _)| *c).collect::<Vec<_>>())
            .collect();
        info!("{} distinct addition pathways", pathways.len());

        let start = first_pathway.min(pathways.len());
        let end = if pathway_count == 0 {
            pathways.len()
        } else {
            (first_pathway + pathway_count).min(pathways.len())
        };

        for (offset, pathway) in pathways[start..end].iter().enumerate() {
            let pathway_index = start + offset;
            info!("starting pathway {pathway_index}");
            let mut id = AggregateId::new(groups.len());
            let mut current_seeds: Vec<Molecule> = Vec::new();

            for (component, monomer) in pathway {
                if stop_requested() {
                    info!("stop file found, halting pathway {pathway_index}");
                    return Ok(());
                }
                id.bump(COMPONENT_LABELS[*component]);
                if current_seeds.is_empty() {
                    current_seeds = vec![(*monomer).clone()];
                    continue;
                }
                let tag = format!("{id}_{pathway_index:03}");
                current_seeds = self.add_one(
                    &tag,
                    &current_seeds,
                    monomer,
                    orientations,
                    method,
                    max_seeds,
                )?;
                if current_seeds.is_empty() {
                    info!("pathway {pathway_index} ran dry, moving on");
                    break;
                }
            }
        }
        Ok(())
    }
}

impl AggregationEngine for Aggregator<'_> {
    fn solvate(
        &self,
        seeds: &[Molecule],
        monomer: &Molecule,
        aggregate_size: usize,
        orientations: usize,
        method: &MethodDescriptor,
        max_seeds: usize,
    ) -> Result<(), EngineError> {
        if stop_requested() {
            info!("stop file found, skipping solvation");
            return Ok(());
        }
        let mut seeds = seeds.to_vec();
        for cycle in 2..aggregate_size + 2 {
            if seeds.is_empty() {
                info!("no seeds left to process");
                return Ok(());
            }
            info!("starting aggregation cycle {cycle}");
            seeds = self.add_one(
                &format!("{cycle:03}"),
                &seeds,
                monomer,
                orientations,
                method,
                max_seeds,
            )?;
            info!("aggregation cycle {cycle} completed");
        }
        Ok(())
    }

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
    ) -> Result<(), EngineError> {
        self.pathway_aggregate(
            &[group_a, group_b],
            &[size_a, size_b],
            orientations,
            method,
            max_seeds,
            first_pathway,
            pathway_count,
        )
    }

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
    ) -> Result<(), EngineError> {
        self.pathway_aggregate(
            &[group_a, group_b, group_c],
            &[size_a, size_b, size_c],
            orientations,
            method,
            max_seeds,
            0,
            0,
        )
    }
}
