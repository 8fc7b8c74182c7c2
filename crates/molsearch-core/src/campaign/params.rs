use super::mode::ModeRequest;
use thiserror::Error;

/// A validation failure for the requested campaign.
///
/// Every variant is fatal to the run: validation is fail-fast and no engine
/// is invoked once a condition is violated. The messages name the offending
/// flag or condition so they can be surfaced verbatim to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "no run mode requested; choose one of --aggregate, --binary-aggregate, \
         --ternary-aggregate, --react, --scan-bond"
    )]
    NoModeRequested,

    #[error("conflicting run modes requested; the mode flags are mutually exclusive")]
    ConflictingModes,

    #[error("--{flag} is required for {mode} runs")]
    MissingArgument {
        mode: &'static str,
        flag: &'static str,
    },

    #[error("{mode} runs need at least {minimum} input molecules, got {found}")]
    TooFewMolecules {
        mode: &'static str,
        minimum: usize,
        found: usize,
    },

    #[error("{mode} runs need exactly {expected} input molecules, got {found}")]
    WrongMoleculeCount {
        mode: &'static str,
        expected: usize,
        found: usize,
    },
}

/// The raw, unvalidated parameter values collected from the command line.
///
/// Which of these are required depends on the active mode; a `RawParams`
/// value is not meaningful until [`Campaign::validate`] accepts it.
#[derive(Debug, Clone)]
pub struct RawParams {
    pub aggregate_size: Option<usize>,
    pub fragment_a: Option<usize>,
    pub fragment_b: Option<usize>,
    pub fragment_c: Option<usize>,
    pub orientations: Option<usize>,
    pub gamma_min: Option<f64>,
    pub gamma_max: Option<f64>,
    pub site: Option<(usize, usize)>,
    pub max_seeds: usize,
    pub first_pathway: usize,
    pub pathway_count: usize,
}

impl Default for RawParams {
    fn default() -> Self {
        Self {
            aggregate_size: None,
            fragment_a: None,
            fragment_b: None,
            fragment_c: None,
            orientations: None,
            gamma_min: None,
            gamma_max: None,
            site: None,
            max_seeds: 8,
            first_pathway: 0,
            pathway_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateParams {
    pub aggregate_size: usize,
    pub orientations: usize,
    pub max_seeds: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryParams {
    pub size_a: usize,
    pub size_b: usize,
    pub orientations: usize,
    pub max_seeds: usize,
    pub first_pathway: usize,
    pub pathway_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryParams {
    pub size_a: usize,
    pub size_b: usize,
    pub size_c: usize,
    pub orientations: usize,
    pub max_seeds: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactParams {
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub orientations: usize,
    pub site: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    pub pair: (usize, usize),
    pub orientations: usize,
}

/// A fully validated campaign: the active mode together with the parameter
/// payload that mode requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Campaign {
    Aggregate(AggregateParams),
    BinaryAggregate(BinaryParams),
    TernaryAggregate(TernaryParams),
    React(ReactParams),
    ScanBond(ScanParams),
}

fn require<T: Copy>(
    value: Option<T>,
    mode: &'static str,
    flag: &'static str,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingArgument { mode, flag })
}

fn require_at_least(
    mode: &'static str,
    minimum: usize,
    found: usize,
) -> Result<(), ValidationError> {
    if found < minimum {
        return Err(ValidationError::TooFewMolecules {
            mode,
            minimum,
            found,
        });
    }
    Ok(())
}

impl Campaign {
    /// Checks the mode's required parameters and molecule-list cardinality,
    /// failing on the first violated condition.
    ///
    /// Validation is pure: the same request, parameters, and molecule count
    /// always yield the same decision.
    pub fn validate(
        request: ModeRequest,
        raw: &RawParams,
        molecule_count: usize,
    ) -> Result<Self, ValidationError> {
        let mode = request.label();
        match request {
            ModeRequest::Aggregate => {
                let aggregate_size = require(raw.aggregate_size, mode, "aggregate-size")?;
                let orientations = require(raw.orientations, mode, "orientations")?;
                require_at_least(mode, 2, molecule_count)?;
                Ok(Campaign::Aggregate(AggregateParams {
                    aggregate_size,
                    orientations,
                    max_seeds: raw.max_seeds,
                }))
            }
            ModeRequest::BinaryAggregate => {
                let size_a = require(raw.fragment_a, mode, "fa")?;
                let size_b = require(raw.fragment_b, mode, "fb")?;
                let orientations = require(raw.orientations, mode, "orientations")?;
                require_at_least(mode, 2, molecule_count)?;
                Ok(Campaign::BinaryAggregate(BinaryParams {
                    size_a,
                    size_b,
                    orientations,
                    max_seeds: raw.max_seeds,
                    first_pathway: raw.first_pathway,
                    pathway_count: raw.pathway_count,
                }))
            }
            ModeRequest::TernaryAggregate => {
                let size_a = require(raw.fragment_a, mode, "fa")?;
                let size_b = require(raw.fragment_b, mode, "fb")?;
                let size_c = require(raw.fragment_c, mode, "fc")?;
                let orientations = require(raw.orientations, mode, "orientations")?;
                if molecule_count != 3 {
                    return Err(ValidationError::WrongMoleculeCount {
                        mode,
                        expected: 3,
                        found: molecule_count,
                    });
                }
                Ok(Campaign::TernaryAggregate(TernaryParams {
                    size_a,
                    size_b,
                    size_c,
                    orientations,
                    max_seeds: raw.max_seeds,
                }))
            }
            ModeRequest::React => {
                let gamma_min = require(raw.gamma_min, mode, "gmin")?;
                let gamma_max = require(raw.gamma_max, mode, "gmax")?;
                let orientations = require(raw.orientations, mode, "orientations")?;
                require_at_least(mode, 2, molecule_count)?;
                Ok(Campaign::React(ReactParams {
                    gamma_min,
                    gamma_max,
                    orientations,
                    site: raw.site,
                }))
            }
            ModeRequest::ScanBond { pair } => {
                let orientations = require(raw.orientations, mode, "orientations")?;
                require_at_least(mode, 2, molecule_count)?;
                Ok(Campaign::ScanBond(ScanParams { pair, orientations }))
            }
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self {
            Campaign::Aggregate(_) => "aggregate",
            Campaign::BinaryAggregate(_) => "binary-aggregate",
            Campaign::TernaryAggregate(_) => "ternary-aggregate",
            Campaign::React(_) => "react",
            Campaign::ScanBond(_) => "scan-bond",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RawParams {
        RawParams {
            aggregate_size: Some(3),
            fragment_a: Some(4),
            fragment_b: Some(6),
            fragment_c: Some(2),
            orientations: Some(10),
            gamma_min: Some(0.5),
            gamma_max: Some(2.0),
            site: None,
            ..RawParams::default()
        }
    }

    #[test]
    fn aggregate_requires_size_and_orientations() {
        let mut raw = filled();
        raw.aggregate_size = None;
        let result = Campaign::validate(ModeRequest::Aggregate, &raw, 3);
        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                mode: "aggregate",
                flag: "aggregate-size"
            })
        );

        let mut raw = filled();
        raw.orientations = None;
        let result = Campaign::validate(ModeRequest::Aggregate, &raw, 3);
        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                mode: "aggregate",
                flag: "orientations"
            })
        );
    }

    #[test]
    fn aggregate_needs_two_molecules() {
        let result = Campaign::validate(ModeRequest::Aggregate, &filled(), 1);
        assert_eq!(
            result,
            Err(ValidationError::TooFewMolecules {
                mode: "aggregate",
                minimum: 2,
                found: 1
            })
        );
    }

    #[test]
    fn binary_requires_both_fragment_sizes() {
        let mut raw = filled();
        raw.fragment_b = None;
        let result = Campaign::validate(ModeRequest::BinaryAggregate, &raw, 2);
        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                mode: "binary-aggregate",
                flag: "fb"
            })
        );
    }

    #[test]
    fn binary_with_one_molecule_is_fatal() {
        let result = Campaign::validate(ModeRequest::BinaryAggregate, &filled(), 1);
        assert_eq!(
            result,
            Err(ValidationError::TooFewMolecules {
                mode: "binary-aggregate",
                minimum: 2,
                found: 1
            })
        );
    }

    #[test]
    fn ternary_cardinality_is_exact_and_fatal() {
        for bad_count in [0, 2, 4] {
            let result = Campaign::validate(ModeRequest::TernaryAggregate, &filled(), bad_count);
            assert_eq!(
                result,
                Err(ValidationError::WrongMoleculeCount {
                    mode: "ternary-aggregate",
                    expected: 3,
                    found: bad_count
                })
            );
        }
        assert!(Campaign::validate(ModeRequest::TernaryAggregate, &filled(), 3).is_ok());
    }

    #[test]
    fn react_requires_gamma_bounds() {
        let mut raw = filled();
        raw.gamma_min = None;
        let result = Campaign::validate(ModeRequest::React, &raw, 2);
        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                mode: "react",
                flag: "gmin"
            })
        );

        let mut raw = filled();
        raw.gamma_max = None;
        let result = Campaign::validate(ModeRequest::React, &raw, 2);
        assert_eq!(
            result,
            Err(ValidationError::MissingArgument {
                mode: "react",
                flag: "gmax"
            })
        );
    }

    #[test]
    fn scan_bond_requires_orientations_and_two_molecules() {
        let request = ModeRequest::ScanBond { pair: (1, 3) };
        let mut raw = filled();
        raw.orientations = None;
        assert!(matches!(
            Campaign::validate(request, &raw, 2),
            Err(ValidationError::MissingArgument { .. })
        ));
        assert!(matches!(
            Campaign::validate(request, &filled(), 1),
            Err(ValidationError::TooFewMolecules { .. })
        ));

        let campaign = Campaign::validate(request, &filled(), 2).unwrap();
        assert_eq!(
            campaign,
            Campaign::ScanBond(ScanParams {
                pair: (1, 3),
                orientations: 10
            })
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let raw = filled();
        let first = Campaign::validate(ModeRequest::React, &raw, 2);
        for _ in 0..3 {
            assert_eq!(Campaign::validate(ModeRequest::React, &raw, 2), first);
        }

        let mut missing = filled();
        missing.orientations = None;
        let first = Campaign::validate(ModeRequest::Aggregate, &missing, 2);
        for _ in 0..3 {
            assert_eq!(Campaign::validate(ModeRequest::Aggregate, &missing, 2), first);
        }
    }

    #[test]
    fn defaults_carry_through_to_payloads() {
        let campaign = Campaign::validate(ModeRequest::BinaryAggregate, &filled(), 2).unwrap();
        let Campaign::BinaryAggregate(params) = campaign else {
            panic!("expected binary payload");
        };
        assert_eq!(params.max_seeds, 8);
        assert_eq!(params.first_pathway, 0);
        assert_eq!(params.pathway_count, 0);
    }
}
