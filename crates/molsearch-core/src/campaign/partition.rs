use super::site::SitePair;
use crate::models::Molecule;
use std::slice;

/// Roles for an aggregate run: the last input molecule is the monomer being
/// added, everything before it is a seed structure.
#[derive(Debug, Clone, Copy)]
pub struct AggregateRoles<'a> {
    pub seeds: &'a [Molecule],
    pub monomer: &'a Molecule,
}

impl<'a> AggregateRoles<'a> {
    pub fn partition(molecules: &'a [Molecule]) -> Self {
        debug_assert!(molecules.len() >= 2);
        let split = molecules.len() - 1;
        Self {
            seeds: &molecules[..split],
            monomer: &molecules[split],
        }
    }
}

/// Roles for a binary-aggregate run: the last molecule forms a singleton
/// group B, everything before it is group A.
#[derive(Debug, Clone, Copy)]
pub struct BinaryRoles<'a> {
    pub group_a: &'a [Molecule],
    pub group_b: &'a [Molecule],
}

impl<'a> BinaryRoles<'a> {
    pub fn partition(molecules: &'a [Molecule]) -> Self {
        debug_assert!(molecules.len() >= 2);
        let split = molecules.len() - 1;
        Self {
            group_a: &molecules[..split],
            group_b: slice::from_ref(&molecules[split]),
        }
    }
}

/// Roles for a ternary-aggregate run: three singleton groups in input order.
#[derive(Debug, Clone, Copy)]
pub struct TernaryRoles<'a> {
    pub group_a: &'a [Molecule],
    pub group_b: &'a [Molecule],
    pub group_c: &'a [Molecule],
}

impl<'a> TernaryRoles<'a> {
    pub fn partition(molecules: &'a [Molecule]) -> Self {
        debug_assert_eq!(molecules.len(), 3);
        Self {
            group_a: slice::from_ref(&molecules[0]),
            group_b: slice::from_ref(&molecules[1]),
            group_c: slice::from_ref(&molecules[2]),
        }
    }
}

/// Roles for a reactive-pathway run: the first two molecules are the
/// reactants, and an optional site constraint is lifted into the combined
/// index space of the pair.
#[derive(Debug, Clone, Copy)]
pub struct ReactRoles<'a> {
    pub reactant_one: &'a Molecule,
    pub reactant_two: &'a Molecule,
    pub site: Option<SitePair>,
}

impl<'a> ReactRoles<'a> {
    pub fn partition(molecules: &'a [Molecule], site: Option<(usize, usize)>) -> Self {
        debug_assert!(molecules.len() >= 2);
        let reactant_one = &molecules[0];
        Self {
            reactant_one,
            reactant_two: &molecules[1],
            site: site.map(|pair| SitePair::across(reactant_one, pair)),
        }
    }
}

/// Roles for a bond-scan run: the first two molecules plus the target pair
/// in the combined index space.
#[derive(Debug, Clone, Copy)]
pub struct ScanRoles<'a> {
    pub first: &'a Molecule,
    pub second: &'a Molecule,
    pub site: SitePair,
}

impl<'a> ScanRoles<'a> {
    pub fn partition(molecules: &'a [Molecule], pair: (usize, usize)) -> Self {
        debug_assert!(molecules.len() >= 2);
        let first = &molecules[0];
        Self {
            first,
            second: &molecules[1],
            site: SitePair::across(first, pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn molecules(n: usize) -> Vec<Molecule> {
        (0..n)
            .map(|i| {
                let symbols = vec!["H".to_string(); i + 1];
                let coordinates = (0..=i).map(|j| Point3::new(j as f64, 0.0, 0.0)).collect();
                Molecule::new(format!("mol{i}"), symbols, coordinates).unwrap()
            })
            .collect()
    }

    #[test]
    fn aggregate_takes_last_as_monomer_preserving_seed_order() {
        let input = molecules(4);
        let roles = AggregateRoles::partition(&input);
        assert_eq!(roles.monomer.name, "mol3");
        assert_eq!(roles.seeds.len(), 3);
        let names: Vec<_> = roles.seeds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["mol0", "mol1", "mol2"]);
    }

    #[test]
    fn binary_puts_only_the_last_molecule_in_group_b() {
        let input = molecules(3);
        let roles = BinaryRoles::partition(&input);
        assert_eq!(roles.group_a.len(), 2);
        assert_eq!(roles.group_b.len(), 1);
        assert_eq!(roles.group_b[0].name, "mol2");
    }

    #[test]
    fn ternary_yields_three_singletons_in_input_order() {
        let input = molecules(3);
        let roles = TernaryRoles::partition(&input);
        assert_eq!(roles.group_a[0].name, "mol0");
        assert_eq!(roles.group_b[0].name, "mol1");
        assert_eq!(roles.group_c[0].name, "mol2");
        assert!([roles.group_a, roles.group_b, roles.group_c]
            .iter()
            .all(|g| g.len() == 1));
    }

    #[test]
    fn react_offsets_the_second_site_index() {
        let input = molecules(2);
        // mol0 has 1 atom, so a requested second index i must become 1 + i.
        let roles = ReactRoles::partition(&input, Some((0, 1)));
        assert_eq!(roles.site.unwrap().as_tuple(), (0, 2));
        assert_eq!(roles.reactant_one.name, "mol0");
        assert_eq!(roles.reactant_two.name, "mol1");

        let roles = ReactRoles::partition(&input, None);
        assert!(roles.site.is_none());
    }

    #[test]
    fn scan_offsets_the_second_site_index() {
        let input = molecules(3);
        let roles = ScanRoles::partition(&input, (0, 1));
        assert_eq!(roles.site.as_tuple(), (0, 2));
        assert_eq!(roles.second.name, "mol1");
    }
}
