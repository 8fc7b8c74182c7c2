use super::aggregator::stop_requested;
use super::error::EngineError;
use super::traits::{Convergence, OptOutcome, Optimiser, OrientationGenerator, ReactionEngine};
use crate::campaign::site::SitePair;
use crate::method::MethodDescriptor;
use crate::models::Molecule;
use tracing::{debug, info};

/// Number of points sampled along the gamma range per orientation.
const GAMMA_STEPS: usize = 10;

/// Displacement in Angstroms applied per unit of gamma when pushing the
/// fragments together between optimisations.
const PUSH_PER_GAMMA: f64 = 0.1;

/// The reactive-pathway search engine.
///
/// For each trial orientation of the reactant pair, the second fragment is
/// pushed toward the first in steps whose size grows from `gamma_min` to
/// `gamma_max`, relaxing the structure after every push. When a site pair is
/// given, orientations whose site atoms start further apart than
/// `proximity_factor` times their covalent contact distance are discarded
/// before any optimisation.
pub struct Reactor<'a> {
    sampler: &'a dyn OrientationGenerator,
    optimiser: &'a dyn Optimiser,
}

impl<'a> Reactor<'a> {
    pub fn new(sampler: &'a dyn OrientationGenerator, optimiser: &'a dyn Optimiser) -> Self {
        Self { sampler, optimiser }
    }
}

impl ReactionEngine for Reactor<'_> {
    fn explore(
        &self,
        reactant_one: &Molecule,
        reactant_two: &Molecule,
        gamma_min: f64,
        gamma_max: f64,
        orientations: usize,
        method: &MethodDescriptor,
        site: Option<SitePair>,
        proximity_factor: f64,
    ) -> Result<(), EngineError> {
        let split = reactant_one.atom_count();
        let combined_atoms = split + reactant_two.atom_count();
        if let Some(site) = site {
            for index in [site.first, site.second] {
                if index >= combined_atoms {
                    return Err(EngineError::AtomIndexOutOfRange {
                        index,
                        atom_count: combined_atoms,
                    });
                }
            }
        }

        let mut guesses = self
            .sampler
            .generate("reaction", reactant_one, reactant_two, orientations)?;
        if let Some(site) = site {
            let before = guesses.len();
            guesses.retain(|guess| {
                let contact =
                    guess.covalent_radius(site.first) + guess.covalent_radius(site.second);
                guess.distance(site.first, site.second) <= proximity_factor * contact
            });
            info!(
                "site constraint kept {} of {} orientations",
                guesses.len(),
                before
            );
        }

        for (index, mut trial) in guesses.into_iter().enumerate() {
            if stop_requested() {
                info!("stop file found, halting reaction exploration");
                return Ok(());
            }
            info!("exploring orientation {index}");

            for step in 0..=GAMMA_STEPS {
                let gamma = gamma_min
                    + (gamma_max - gamma_min) * step as f64 / GAMMA_STEPS as f64;
                let axis = trial_axis(&trial, split);
                trial.translate_atoms(split..trial.atom_count(), &(axis * gamma * PUSH_PER_GAMMA));
                trial.name = format!("reaction_{index:03}_g{step:02}");

                match self
                    .optimiser
                    .optimise(&mut trial, method, Convergence::Normal, None)?
                {
                    OptOutcome::Converged => {
                        debug!(
                            structure = %trial.name,
                            gamma,
                            energy = ?trial.energy,
                            "pathway point relaxed"
                        );
                    }
                    outcome => {
                        debug!(structure = %trial.name, ?outcome, "abandoning orientation");
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Unit vector from the second fragment's centroid toward the first's.
fn trial_axis(trial: &Molecule, split: usize) -> nalgebra::Vector3<f64> {
    let coordinates = trial.coordinates();
    let first: nalgebra::Vector3<f64> = coordinates[..split]
        .iter()
        .map(|p| p.coords)
        .sum::<nalgebra::Vector3<f64>>()
        / split.max(1) as f64;
    let second: nalgebra::Vector3<f64> = coordinates[split..]
        .iter()
        .map(|p| p.coords)
        .sum::<nalgebra::Vector3<f64>>()
        / (coordinates.len() - split).max(1) as f64;
    let axis = first - second;
    let norm = axis.norm();
    if norm < 1e-9 {
        nalgebra::Vector3::x()
    } else {
        axis / norm
    }
}
