use super::traits::GeometrySelector;
use crate::models::Molecule;
use crate::utils::geometry::calculate_rmsd;
use tracing::debug;

/// RMSD-based geometry selection.
///
/// Two structures with the same atom count are considered duplicates when
/// their raw coordinate RMSD falls below the threshold. Selection ranks by
/// energy where available (lower first); structures without an energy sort
/// last.
pub struct RmsdSelector {
    pub similarity_threshold: f64,
}

impl Default for RmsdSelector {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
        }
    }
}

impl GeometrySelector for RmsdSelector {
    fn remove_similar(&self, molecules: Vec<Molecule>) -> Vec<Molecule> {
        let mut kept: Vec<Molecule> = Vec::with_capacity(molecules.len());
        for candidate in molecules {
            let duplicate = kept.iter().any(|existing| {
                calculate_rmsd(existing.coordinates(), candidate.coordinates())
                    .is_some_and(|rmsd| rmsd < self.similarity_threshold)
            });
            if duplicate {
                debug!("dropping near-duplicate structure '{}'", candidate.name);
            } else {
                kept.push(candidate);
            }
        }
        kept
    }

    fn choose_geometries(&self, molecules: Vec<Molecule>, max_seeds: usize) -> Vec<Molecule> {
        let mut unique = self.remove_similar(molecules);
        unique.sort_by(|a, b| match (a.energy, b.energy) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        unique.truncate(max_seeds);
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn structure(name: &str, x: f64, energy: Option<f64>) -> Molecule {
        let mut molecule = Molecule::new(
            name,
            vec!["H".to_string(), "H".to_string()],
            vec![Point3::new(x, 0.0, 0.0), Point3::new(x, 0.0, 0.74)],
        )
        .unwrap();
        molecule.energy = energy;
        molecule
    }

    #[test]
    fn near_duplicates_are_dropped_keeping_the_first() {
        let selector = RmsdSelector::default();
        let kept = selector.remove_similar(vec![
            structure("first", 0.0, None),
            structure("echo", 0.1, None),
            structure("far", 5.0, None),
        ]);
        let names: Vec<_> = kept.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["first", "far"]);
    }

    #[test]
    fn different_atom_counts_are_never_merged() {
        let selector = RmsdSelector::default();
        let single = Molecule::new(
            "single",
            vec!["H".to_string()],
            vec![Point3::new(0.0, 0.0, 0.0)],
        )
        .unwrap();
        let kept = selector.remove_similar(vec![structure("pair", 0.0, None), single]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn selection_is_energy_ranked_and_capped() {
        let selector = RmsdSelector::default();
        let chosen = selector.choose_geometries(
            vec![
                structure("high", 0.0, Some(-1.0)),
                structure("unscored", 4.0, None),
                structure("low", 8.0, Some(-3.0)),
                structure("mid", 12.0, Some(-2.0)),
            ],
            2,
        );
        let names: Vec<_> = chosen.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["low", "mid"]);
    }
}
