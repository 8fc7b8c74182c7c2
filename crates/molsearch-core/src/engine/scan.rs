use super::error::EngineError;
use super::traits::{Convergence, Optimiser, OrientationGenerator};
use crate::campaign::site::SitePair;
use crate::method::MethodDescriptor;
use crate::models::Molecule;
use tracing::{debug, error, info};

/// Steps per Angstrom of scanned bond distance.
const STEPS_PER_ANGSTROM: f64 = 10.0;

/// Number of scan steps for driving `site` from its current separation to
/// covalent contact, truncated toward zero. Negative when the pair starts
/// beyond contact distance, i.e. the scan shortens the bond.
pub fn scan_steps(structure: &Molecule, site: SitePair) -> i64 {
    let target = structure.covalent_radius(site.first) + structure.covalent_radius(site.second);
    let current = structure.distance(site.first, site.second);
    ((target - current) * STEPS_PER_ANGSTROM) as i64
}

/// Runs the bond-scan campaign over the combined structure of two molecules.
///
/// For every guessed orientation the target-pair separation is driven from
/// its current value to the covalent contact distance. Backends without a
/// scan input format log an error for that structure and the loop continues;
/// this is the only non-fatal failure in the campaign layer.
#[allow(clippy::too_many_arguments)]
pub fn run(
    first: &Molecule,
    second: &Molecule,
    site: SitePair,
    orientations: usize,
    method: &MethodDescriptor,
    guesser: &dyn OrientationGenerator,
    optimiser: &dyn Optimiser,
) -> Result<(), EngineError> {
    let combined_atoms = first.atom_count() + second.atom_count();
    for index in [site.first, site.second] {
        if index >= combined_atoms {
            return Err(EngineError::AtomIndexOutOfRange {
                index,
                atom_count: combined_atoms,
            });
        }
    }

    let guesses = guesser.generate("scan", first, second, orientations)?;
    info!("scanning {} guessed orientations", guesses.len());

    for mut structure in guesses {
        let target =
            structure.covalent_radius(site.first) + structure.covalent_radius(site.second);
        let current = structure.distance(site.first, site.second);
        let steps = scan_steps(&structure, site);
        debug!(
            structure = %structure.name,
            current, target, steps, "scan window computed"
        );

        match method.backend.scan_directive(site, current, target, steps) {
            Some(directive) => {
                let outcome = optimiser.optimise(
                    &mut structure,
                    method,
                    Convergence::Normal,
                    Some(&directive),
                )?;
                debug!(structure = %structure.name, ?outcome, "scan optimisation finished");
            }
            None => {
                error!(
                    "backend '{}' cannot express a bond-scan directive; skipping '{}'",
                    method.backend, structure.name
                );
            }
        }
    }
    Ok(())
}
