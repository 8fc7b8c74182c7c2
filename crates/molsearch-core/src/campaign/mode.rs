use super::params::ValidationError;

/// The run mode requested on the command line.
///
/// Exactly one mode is active per invocation. The CLI argument schema already
/// enforces mutual exclusion; [`ModeRequest::from_flags`] re-asserts it so a
/// violated upstream guarantee surfaces as a configuration error instead of
/// partial execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    /// Grow a cluster by repeatedly adding the last input molecule to the
    /// preceding seed structures.
    Aggregate,
    /// Exhaustive two-component aggregation over addition pathways.
    BinaryAggregate,
    /// Exhaustive three-component aggregation over addition pathways.
    TernaryAggregate,
    /// Reactive-pathway search between the first two input molecules.
    React,
    /// Distance scan over one bond of the combined two-molecule structure.
    /// The pair is given as raw indices: the first into molecule 0, the
    /// second into molecule 1.
    ScanBond { pair: (usize, usize) },
}

impl ModeRequest {
    /// Maps the mutually exclusive CLI flags to the single active mode.
    pub fn from_flags(
        aggregate: bool,
        binary_aggregate: bool,
        ternary_aggregate: bool,
        react: bool,
        scan_bond: Option<(usize, usize)>,
    ) -> Result<Self, ValidationError> {
        let mut selected = Vec::with_capacity(1);
        if aggregate {
            selected.push(ModeRequest::Aggregate);
        }
        if binary_aggregate {
            selected.push(ModeRequest::BinaryAggregate);
        }
        if ternary_aggregate {
            selected.push(ModeRequest::TernaryAggregate);
        }
        if react {
            selected.push(ModeRequest::React);
        }
        if let Some(pair) = scan_bond {
            selected.push(ModeRequest::ScanBond { pair });
        }
        match selected.len() {
            0 => Err(ValidationError::NoModeRequested),
            1 => Ok(selected[0]),
            _ => Err(ValidationError::ConflictingModes),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModeRequest::Aggregate => "aggregate",
            ModeRequest::BinaryAggregate => "binary-aggregate",
            ModeRequest::TernaryAggregate => "ternary-aggregate",
            ModeRequest::React => "react",
            ModeRequest::ScanBond { .. } => "scan-bond",
        }
    }
}
