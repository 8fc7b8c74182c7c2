use phf::{Map, phf_map};

/// Single-bond covalent radii in Angstroms, indexed by element symbol.
///
/// Values follow the Cordero et al. (2008) compilation, which is the set
/// used to decide contact distances during orientation generation and to
/// derive bond-scan targets.
pub static COVALENT_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 0.31,
    "He" => 0.28,
    "Li" => 1.28,
    "Be" => 0.96,
    "B" => 0.84,
    "C" => 0.76,
    "N" => 0.71,
    "O" => 0.66,
    "F" => 0.57,
    "Ne" => 0.58,
    "Na" => 1.66,
    "Mg" => 1.41,
    "Al" => 1.21,
    "Si" => 1.11,
    "P" => 1.07,
    "S" => 1.05,
    "Cl" => 1.02,
    "Ar" => 1.06,
    "K" => 2.03,
    "Ca" => 1.76,
    "Sc" => 1.70,
    "Ti" => 1.60,
    "V" => 1.53,
    "Cr" => 1.39,
    "Mn" => 1.39,
    "Fe" => 1.32,
    "Co" => 1.26,
    "Ni" => 1.24,
    "Cu" => 1.32,
    "Zn" => 1.22,
    "Ga" => 1.22,
    "Ge" => 1.20,
    "As" => 1.19,
    "Se" => 1.20,
    "Br" => 1.20,
    "Kr" => 1.16,
    "Rb" => 2.20,
    "Sr" => 1.95,
    "Pd" => 1.39,
    "Ag" => 1.45,
    "Cd" => 1.44,
    "Sn" => 1.39,
    "I" => 1.39,
    "Xe" => 1.40,
    "Cs" => 2.44,
    "Ba" => 2.15,
    "Pt" => 1.36,
    "Au" => 1.36,
    "Hg" => 1.32,
    "Pb" => 1.46,
};

/// Looks up the covalent radius for an element symbol.
pub fn covalent_radius(symbol: &str) -> Option<f64> {
    COVALENT_RADII.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_elements_have_radii() {
        assert_eq!(covalent_radius("H"), Some(0.31));
        assert_eq!(covalent_radius("C"), Some(0.76));
        assert_eq!(covalent_radius("Au"), Some(1.36));
    }

    #[test]
    fn unknown_symbol_returns_none() {
        assert_eq!(covalent_radius("Xx"), None);
        assert_eq!(covalent_radius("h"), None);
    }
}
