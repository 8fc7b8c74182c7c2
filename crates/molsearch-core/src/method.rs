use crate::campaign::site::SitePair;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MethodError {
    #[error("multiplicity must be at least 1 (got {0})")]
    InvalidMultiplicity(u32),

    #[error("unknown SCF type '{0}'; expected 'restricted' or 'unrestricted'")]
    UnknownScfType(String),

    #[error("unknown backend '{0}'; supported: xtb, orca, psi4, mopac, gaussian")]
    UnknownBackend(String),
}

/// Self-consistent-field treatment requested for the electronic structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScfType {
    #[default]
    Restricted,
    Unrestricted,
}

/// The external quantum-chemistry program that evaluates energies and
/// gradients. The set is closed; campaign dispatch never sees a free-form
/// program name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Xtb,
    Orca,
    Psi4,
    Mopac,
    Gaussian,
}

impl Backend {
    /// Whether this backend's input format can express a bond-distance scan.
    pub fn supports_bond_scan(self) -> bool {
        matches!(self, Backend::Xtb)
    }

    /// Builds the backend-specific scan directive for a bond-distance scan
    /// over `pair` in the combined index space, from `start` to `target`
    /// Angstroms in `steps` steps.
    ///
    /// Returns `None` for backends without a scan input format. The atom
    /// indices are emitted one-based, as the backend input formats expect.
    pub fn scan_directive(
        self,
        pair: SitePair,
        start: f64,
        target: f64,
        steps: i64,
    ) -> Option<String> {
        match self {
            Backend::Xtb => Some(format!(
                "$scan\n  distance: {}, {}, {:.4}; {:.4}, {:.4}, {}\n$end\n",
                pair.first + 1,
                pair.second + 1,
                start,
                start,
                target,
                steps
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Xtb => "xtb",
            Backend::Orca => "orca",
            Backend::Psi4 => "psi4",
            Backend::Mopac => "mopac",
            Backend::Gaussian => "gaussian",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xtb" => Ok(Backend::Xtb),
            "orca" => Ok(Backend::Orca),
            "psi4" => Ok(Backend::Psi4),
            "mopac" => Ok(Backend::Mopac),
            "gaussian" | "g16" => Ok(Backend::Gaussian),
            other => Err(MethodError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for ScfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScfType::Restricted => f.write_str("restricted"),
            ScfType::Unrestricted => f.write_str("unrestricted"),
        }
    }
}

impl FromStr for ScfType {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restricted" | "rhf" => Ok(ScfType::Restricted),
            "unrestricted" | "uhf" => Ok(ScfType::Unrestricted),
            other => Err(MethodError::UnknownScfType(other.to_string())),
        }
    }
}

/// The normalized electronic-structure method threaded through every engine
/// call.
///
/// Constructed exactly once per run from validated CLI values and never
/// mutated afterwards; every dispatch path shares it read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub charge: i32,
    pub multiplicity: u32,
    pub scf_type: ScfType,
    pub backend: Backend,
}

impl MethodDescriptor {
    pub fn new(
        charge: i32,
        multiplicity: u32,
        scf_type: ScfType,
        backend: Backend,
    ) -> Result<Self, MethodError> {
        if multiplicity < 1 {
            return Err(MethodError::InvalidMultiplicity(multiplicity));
        }
        Ok(Self {
            charge,
            multiplicity,
            scf_type,
            backend,
        })
    }

    /// Number of unpaired electrons, as some backends (e.g. xtb's `--uhf`)
    /// express multiplicity.
    pub fn unpaired_electrons(&self) -> u32 {
        self.multiplicity - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_multiplicity_is_rejected() {
        let result = MethodDescriptor::new(0, 0, ScfType::Restricted, Backend::Xtb);
        assert_eq!(result, Err(MethodError::InvalidMultiplicity(0)));
    }

    #[test]
    fn singlet_neutral_method_is_accepted() {
        let method = MethodDescriptor::new(0, 1, ScfType::Restricted, Backend::Orca).unwrap();
        assert_eq!(method.unpaired_electrons(), 0);
    }

    #[test]
    fn backend_names_round_trip() {
        for name in ["xtb", "orca", "psi4", "mopac", "gaussian"] {
            let backend: Backend = name.parse().unwrap();
            assert_eq!(backend.to_string(), name);
        }
        assert!(matches!(
            "vasp".parse::<Backend>(),
            Err(MethodError::UnknownBackend(_))
        ));
    }

    #[test]
    fn scf_type_parsing_accepts_aliases() {
        assert_eq!("RHF".parse::<ScfType>().unwrap(), ScfType::Restricted);
        assert_eq!("uhf".parse::<ScfType>().unwrap(), ScfType::Unrestricted);
        assert!("rohf".parse::<ScfType>().is_err());
    }

    #[test]
    fn only_xtb_yields_a_scan_directive() {
        let pair = SitePair {
            first: 0,
            second: 4,
        };
        let directive = Backend::Xtb.scan_directive(pair, 2.5, 1.4, -11).unwrap();
        assert!(directive.contains("distance: 1, 5"));
        assert!(directive.contains("2.5000"));
        assert!(directive.contains("1.4000"));
        assert!(directive.contains("-11"));

        for backend in [Backend::Orca, Backend::Psi4, Backend::Mopac, Backend::Gaussian] {
            assert!(backend.scan_directive(pair, 2.5, 1.4, -11).is_none());
        }
    }
}
