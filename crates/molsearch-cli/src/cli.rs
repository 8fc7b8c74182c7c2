use clap::{Args, Parser};
use molsearch::campaign::{ModeRequest, RawParams, ValidationError};
use molsearch::method::{Backend, ScfType};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molsearch - automated structure search for molecular aggregation, \
             reaction-pathway exploration, and bond-distance scans.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Input coordinate files in XYZ format.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub mode: ModeFlags,

    // --- Mode Parameters ---
    /// Number of monomers to add during aggregation.
    #[arg(long, value_name = "INT")]
    pub aggregate_size: Option<usize>,

    /// Number of fragments of the first component.
    #[arg(long = "fa", value_name = "INT")]
    pub fragment_a: Option<usize>,

    /// Number of fragments of the second component.
    #[arg(long = "fb", value_name = "INT")]
    pub fragment_b: Option<usize>,

    /// Number of fragments of the third component.
    #[arg(long = "fc", value_name = "INT")]
    pub fragment_c: Option<usize>,

    /// Number of trial orientations per growth step.
    #[arg(short = 'N', long, value_name = "INT")]
    pub orientations: Option<usize>,

    /// Lower bound of the reaction-coordinate scan range.
    #[arg(long, value_name = "FLOAT")]
    pub gmin: Option<f64>,

    /// Upper bound of the reaction-coordinate scan range.
    #[arg(long, value_name = "FLOAT")]
    pub gmax: Option<f64>,

    /// Constrain the reaction to an atom pair: the first index into the
    /// first molecule, the second into the second molecule.
    #[arg(long, num_args = 2, value_names = ["A", "B"])]
    pub site: Option<Vec<usize>>,

    /// Maximum number of seed structures carried into the next cycle.
    #[arg(long, default_value_t = 8, value_name = "INT")]
    pub max_seeds: usize,

    /// First addition pathway to compute (for restarting a broken run).
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub first_pathway: usize,

    /// Number of addition pathways to compute (0 means all remaining).
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub pathway_count: usize,

    // --- Chemistry Parameters ---
    /// Total charge of the system.
    #[arg(short = 'c', long, default_value_t = 0, value_name = "INT")]
    pub charge: i32,

    /// Spin multiplicity of the system.
    #[arg(short = 'm', long, default_value_t = 1, value_name = "INT")]
    pub multiplicity: u32,

    /// SCF treatment: restricted or unrestricted.
    #[arg(long, default_value = "restricted", value_name = "TYPE")]
    pub scf_type: ScfType,

    /// Quantum-chemistry backend: xtb, orca, psi4, mopac, or gaussian.
    #[arg(long, value_name = "NAME")]
    pub software: Backend,

    // --- Logging ---
    /// Verbosity level 0-4 (error, warn, info, debug, trace).
    #[arg(short = 'v', long, default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(0..=4), value_name = "LEVEL")]
    pub verbosity: u8,

    /// Write logs to a file in addition to the console output.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// The mutually exclusive campaign flags; exactly one must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ModeFlags {
    /// Grow a cluster by adding the last input molecule to the preceding
    /// seed structures.
    #[arg(long)]
    pub aggregate: bool,

    /// Exhaustive two-component aggregation over addition pathways.
    #[arg(long)]
    pub binary_aggregate: bool,

    /// Exhaustive three-component aggregation over addition pathways.
    #[arg(long)]
    pub ternary_aggregate: bool,

    /// Reactive-pathway search between the first two input molecules.
    #[arg(long)]
    pub react: bool,

    /// Scan the bond between two atoms: the first index into the first
    /// molecule, the second into the second molecule.
    #[arg(long, num_args = 2, value_names = ["A", "B"])]
    pub scan_bond: Option<Vec<usize>>,
}

impl Cli {
    /// Maps the flag group onto the single active run mode.
    pub fn mode_request(&self) -> Result<ModeRequest, ValidationError> {
        let scan_pair = self
            .mode
            .scan_bond
            .as_ref()
            .map(|pair| (pair[0], pair[1]));
        ModeRequest::from_flags(
            self.mode.aggregate,
            self.mode.binary_aggregate,
            self.mode.ternary_aggregate,
            self.mode.react,
            scan_pair,
        )
    }

    /// Collects the raw mode parameters for validation.
    pub fn raw_params(&self) -> RawParams {
        RawParams {
            aggregate_size: self.aggregate_size,
            fragment_a: self.fragment_a,
            fragment_b: self.fragment_b,
            fragment_c: self.fragment_c,
            orientations: self.orientations,
            gamma_min: self.gmin,
            gamma_max: self.gmax,
            site: self.site.as_ref().map(|pair| (pair[0], pair[1])),
            max_seeds: self.max_seeds,
            first_pathway: self.first_pathway,
            pathway_count: self.pathway_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn aggregate_invocation_parses_with_defaults() {
        let cli = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "b.xyz",
            "c.xyz",
            "--aggregate",
            "--aggregate-size",
            "3",
            "-N",
            "10",
            "--software",
            "xtb",
        ])
        .unwrap();

        assert_eq!(cli.files.len(), 3);
        assert_eq!(cli.mode_request().unwrap(), ModeRequest::Aggregate);
        assert_eq!(cli.charge, 0);
        assert_eq!(cli.multiplicity, 1);
        assert_eq!(cli.scf_type, ScfType::Restricted);
        assert_eq!(cli.software, Backend::Xtb);

        let raw = cli.raw_params();
        assert_eq!(raw.aggregate_size, Some(3));
        assert_eq!(raw.orientations, Some(10));
        assert_eq!(raw.max_seeds, 8);
        assert_eq!(raw.first_pathway, 0);
        assert_eq!(raw.pathway_count, 0);
    }

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "--aggregate",
            "--react",
            "--software",
            "xtb",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn a_mode_flag_is_required() {
        let result = Cli::try_parse_from(["molsearch", "a.xyz", "--software", "xtb"]);
        assert!(result.is_err());
    }

    #[test]
    fn scan_bond_takes_two_indices() {
        let cli = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "b.xyz",
            "--scan-bond",
            "1",
            "3",
            "-N",
            "20",
            "--software",
            "mopac",
        ])
        .unwrap();
        assert_eq!(
            cli.mode_request().unwrap(),
            ModeRequest::ScanBond { pair: (1, 3) }
        );

        let result = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "--scan-bond",
            "1",
            "--software",
            "mopac",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn react_invocation_carries_gamma_bounds_and_site() {
        let cli = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "b.xyz",
            "--react",
            "--gmin",
            "0.5",
            "--gmax",
            "2.0",
            "-N",
            "5",
            "--site",
            "0",
            "2",
            "--software",
            "orca",
        ])
        .unwrap();

        let raw = cli.raw_params();
        assert_eq!(raw.gamma_min, Some(0.5));
        assert_eq!(raw.gamma_max, Some(2.0));
        assert_eq!(raw.site, Some((0, 2)));
    }

    #[test]
    fn unknown_backend_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "--aggregate",
            "--software",
            "vasp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_is_capped_at_four() {
        let result = Cli::try_parse_from([
            "molsearch",
            "a.xyz",
            "--aggregate",
            "--software",
            "xtb",
            "-v",
            "7",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn at_least_one_input_file_is_required() {
        let result = Cli::try_parse_from(["molsearch", "--aggregate", "--software", "xtb"]);
        assert!(result.is_err());
    }
}
