use super::error::EngineError;
use super::traits::OrientationGenerator;
use crate::models::Molecule;
use nalgebra::{Rotation3, Unit, Vector3};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::f64::consts::TAU;
use tracing::debug;

/// Attempts at drawing a non-tabu direction before giving up and accepting
/// whatever comes next.
const MAX_DIRECTION_ATTEMPTS: usize = 100;

/// Random rigid-body placement of a fragment around a seed, with a tabu list
/// of already-used approach directions.
///
/// Each orientation puts the fragment's centroid on a sphere around the seed
/// at covalent contact distance (seed extent plus fragment extent) with a
/// random internal rotation. Directions closer than `minimum_angle_degrees`
/// to a previously accepted direction are rejected, which spreads the trial
/// placements over the sphere instead of clumping them.
pub struct TabuSampler {
    pub minimum_angle_degrees: f64,
}

impl Default for TabuSampler {
    fn default() -> Self {
        Self {
            minimum_angle_degrees: 15.0,
        }
    }
}

impl TabuSampler {
    fn pick_direction(&self, rng: &mut ThreadRng, used: &[Vector3<f64>]) -> Vector3<f64> {
        let cutoff = self.minimum_angle_degrees.to_radians();
        for attempt in 0..MAX_DIRECTION_ATTEMPTS {
            let candidate = random_unit_vector(rng);
            let tabu = used.iter().any(|d| d.angle(&candidate) < cutoff);
            if !tabu {
                return candidate;
            }
            if attempt == MAX_DIRECTION_ATTEMPTS - 1 {
                debug!("direction sphere saturated, accepting a tabu direction");
            }
        }
        random_unit_vector(rng)
    }
}

impl OrientationGenerator for TabuSampler {
    fn generate(
        &self,
        tag: &str,
        seed: &Molecule,
        fragment: &Molecule,
        count: usize,
    ) -> Result<Vec<Molecule>, EngineError> {
        let mut rng = rand::thread_rng();
        let mut used_directions: Vec<Vector3<f64>> = Vec::with_capacity(count);
        let mut orientations = Vec::with_capacity(count);

        let centre = seed.centroid();
        let contact_distance = seed.extent() + fragment.extent();

        for index in 0..count {
            let direction = self.pick_direction(&mut rng, &used_directions);
            used_directions.push(direction);

            let rotation = random_rotation(&mut rng);
            let placed = fragment.oriented(&rotation, centre + direction * contact_distance);
            orientations.push(Molecule::merged(
                format!("{tag}_{index:03}"),
                seed,
                &placed,
            ));
        }
        Ok(orientations)
    }
}

fn random_unit_vector(rng: &mut ThreadRng) -> Vector3<f64> {
    loop {
        let candidate = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let norm = candidate.norm();
        if norm > 1e-6 && norm <= 1.0 {
            return candidate / norm;
        }
    }
}

fn random_rotation(rng: &mut ThreadRng) -> Rotation3<f64> {
    let axis = Unit::new_normalize(random_unit_vector(rng));
    Rotation3::from_axis_angle(&axis, rng.gen_range(0.0..TAU))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn water(name: &str) -> Molecule {
        Molecule::new(
            name,
            vec!["O".to_string(), "H".to_string(), "H".to_string()],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.96),
                Point3::new(0.93, 0.0, -0.24),
            ],
        )
        .unwrap()
    }

    #[test]
    fn generates_the_requested_number_of_combined_structures() {
        let sampler = TabuSampler::default();
        let seed = water("seed");
        let fragment = water("fragment");
        let orientations = sampler.generate("002_000", &seed, &fragment, 8).unwrap();

        assert_eq!(orientations.len(), 8);
        for (i, orientation) in orientations.iter().enumerate() {
            assert_eq!(orientation.name, format!("002_000_{i:03}"));
            assert_eq!(orientation.atom_count(), 6);
        }
    }

    #[test]
    fn seed_atoms_keep_their_positions() {
        let sampler = TabuSampler::default();
        let seed = water("seed");
        let fragment = water("fragment");
        let orientations = sampler.generate("t", &seed, &fragment, 4).unwrap();

        for orientation in &orientations {
            for (merged, original) in orientation.coordinates()[..3]
                .iter()
                .zip(seed.coordinates())
            {
                assert_eq!(merged, original);
            }
        }
    }

    #[test]
    fn fragments_do_not_collapse_onto_the_seed() {
        let sampler = TabuSampler::default();
        let seed = water("seed");
        let fragment = water("fragment");
        let orientations = sampler.generate("t", &seed, &fragment, 16).unwrap();

        let seed_centre = seed.centroid();
        for orientation in &orientations {
            let fragment_centre: Vector3<f64> = orientation.coordinates()[3..]
                .iter()
                .map(|p| p.coords)
                .sum::<Vector3<f64>>()
                / 3.0;
            let separation = (fragment_centre - seed_centre.coords).norm();
            assert!(separation > 1.0, "fragment placed too close: {separation}");
        }
    }
}
