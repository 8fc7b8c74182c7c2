use crate::cli::Cli;
use crate::engines::ExternalOptimiser;
use crate::error::{CliError, Result};
use molsearch::campaign::{Campaign, Dispatcher};
use molsearch::engine::aggregator::Aggregator;
use molsearch::engine::cluster::RmsdSelector;
use molsearch::engine::reactor::Reactor;
use molsearch::engine::tabu::TabuSampler;
use molsearch::method::MethodDescriptor;
use molsearch::models::Molecule;
use std::path::Path;
use tracing::{error, info};

const SCRATCH_DIR: &str = "molsearch_scratch";

fn load_molecules(paths: &[impl AsRef<Path>]) -> Result<Vec<Molecule>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            Molecule::from_xyz_path(path).map_err(|source| {
                error!("cannot read '{}': {source}", path.display());
                CliError::InputFile {
                    path: path.to_path_buf(),
                    source,
                }
            })
        })
        .collect()
}

/// Runs one full campaign: load inputs, validate, dispatch.
pub fn execute(cli: &Cli) -> Result<()> {
    let molecules = load_molecules(&cli.files)?;
    info!("loaded {} input molecules", molecules.len());

    let method =
        MethodDescriptor::new(cli.charge, cli.multiplicity, cli.scf_type, cli.software)?;

    let request = cli.mode_request()?;
    let campaign = Campaign::validate(request, &cli.raw_params(), molecules.len())?;

    let optimiser = ExternalOptimiser::new(SCRATCH_DIR)?;
    let sampler = TabuSampler::default();
    let selector = RmsdSelector::default();
    let aggregator = Aggregator::new(&sampler, &optimiser, &selector);
    let reactor = Reactor::new(&sampler, &optimiser);

    let dispatcher = Dispatcher {
        aggregation: &aggregator,
        reaction: &reactor,
        bond_guesser: &sampler,
        optimiser: &optimiser,
    };
    dispatcher.dispatch(&campaign, &molecules, &method)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loading_a_missing_file_names_the_path() {
        let result = load_molecules(&["no_such_file.xyz"]);
        let Err(CliError::InputFile { path, .. }) = result else {
            panic!("expected an input-file error");
        };
        assert_eq!(path, Path::new("no_such_file.xyz"));
    }

    #[test]
    fn loading_reads_every_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for name in ["first", "second"] {
            let path = dir.path().join(format!("{name}.xyz"));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "1\n\nH 0.0 0.0 0.0").unwrap();
            paths.push(path);
        }

        let molecules = load_molecules(&paths).unwrap();
        assert_eq!(molecules.len(), 2);
        assert_eq!(molecules[0].name, "first");
        assert_eq!(molecules[1].name, "second");
    }
}
