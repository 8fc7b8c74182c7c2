use molsearch::engine::error::EngineError;
use molsearch::engine::traits::{Convergence, OptOutcome, Optimiser};
use molsearch::method::{Backend, MethodDescriptor, ScfType};
use molsearch::models::Molecule;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Geometry optimiser that shells out to the selected quantum-chemistry
/// program.
///
/// Every optimisation gets its own job directory under the scratch root,
/// keyed by a running counter plus the structure name, so backend output
/// files never collide and failed jobs stay inspectable.
pub struct ExternalOptimiser {
    scratch_root: PathBuf,
    job_counter: AtomicUsize,
}

impl ExternalOptimiser {
    pub fn new(scratch_root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let scratch_root = scratch_root.into();
        fs::create_dir_all(&scratch_root)?;
        Ok(Self {
            scratch_root,
            job_counter: AtomicUsize::new(0),
        })
    }

    fn job_dir(&self, name: &str) -> std::io::Result<PathBuf> {
        let id = self.job_counter.fetch_add(1, Ordering::Relaxed);
        let dir = self.scratch_root.join(format!("job_{id:05}_{name}"));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl Optimiser for ExternalOptimiser {
    fn optimise(
        &self,
        molecule: &mut Molecule,
        method: &MethodDescriptor,
        convergence: Convergence,
        directive: Option<&str>,
    ) -> Result<OptOutcome, EngineError> {
        if directive.is_some() && !method.backend.supports_bond_scan() {
            return Err(EngineError::ScanUnsupported {
                backend: method.backend.to_string(),
            });
        }

        let dir = self.job_dir(&molecule.name)?;
        debug!(job = %dir.display(), backend = %method.backend, "starting optimisation");

        match method.backend {
            Backend::Xtb => run_xtb(&dir, molecule, method, convergence, directive),
            Backend::Orca => run_orca(&dir, molecule, method),
            Backend::Psi4 => run_psi4(&dir, molecule, method),
            Backend::Mopac => run_mopac(&dir, molecule, method),
            Backend::Gaussian => run_gaussian(&dir, molecule, method),
        }
    }
}

fn invoke(dir: &Path, backend: Backend, command: &mut Command) -> Result<std::process::Output, EngineError> {
    command.current_dir(dir).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::BackendInvocation {
                backend: backend.to_string(),
                reason: "program not found on PATH".to_string(),
            }
        } else {
            EngineError::Io(e)
        }
    })
}

fn run_xtb(
    dir: &Path,
    molecule: &mut Molecule,
    method: &MethodDescriptor,
    convergence: Convergence,
    directive: Option<&str>,
) -> Result<OptOutcome, EngineError> {
    let input = dir.join("mol.xyz");
    molecule.write_xyz(&input)?;

    let level = match convergence {
        Convergence::Loose => "loose",
        Convergence::Normal => "normal",
        Convergence::Tight => "tight",
    };

    let mut command = Command::new("xtb");
    command
        .arg("mol.xyz")
        .arg("--opt")
        .arg(level)
        .arg("--chrg")
        .arg(method.charge.to_string())
        .arg("--uhf")
        .arg(method.unpaired_electrons().to_string());
    if let Some(directive) = directive {
        fs::write(dir.join("scan.inp"), directive)?;
        command.arg("--input").arg("scan.inp");
    }

    let output = invoke(dir, Backend::Xtb, &mut command)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    fs::write(dir.join("xtb.out"), stdout.as_bytes())?;

    let optimised = dir.join("xtbopt.xyz");
    if optimised.exists() {
        let refreshed = Molecule::from_xyz_path(&optimised)?;
        let name = molecule.name.clone();
        *molecule = refreshed;
        molecule.name = name;
    }

    if output.status.success() {
        Ok(OptOutcome::Converged)
    } else if stdout.contains("FAILED TO CONVERGE") {
        Ok(OptOutcome::CycleExceeded)
    } else {
        warn!("xtb exited with {} for '{}'", output.status, molecule.name);
        Ok(OptOutcome::Failed)
    }
}

fn run_orca(
    dir: &Path,
    molecule: &mut Molecule,
    method: &MethodDescriptor,
) -> Result<OptOutcome, EngineError> {
    let scf = match method.scf_type {
        ScfType::Restricted => "RHF",
        ScfType::Unrestricted => "UHF",
    };
    let mut input = format!("! {scf} PM3 Opt\n\n* xyz {} {}\n", method.charge, method.multiplicity);
    push_coordinate_block(&mut input, molecule);
    input.push_str("*\n");
    fs::write(dir.join("job.inp"), input)?;

    let output = invoke(dir, Backend::Orca, Command::new("orca").arg("job.inp"))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    fs::write(dir.join("job.out"), stdout.as_bytes())?;

    let optimised = dir.join("job.xyz");
    if optimised.exists() {
        let refreshed = Molecule::from_xyz_path(&optimised)?;
        let name = molecule.name.clone();
        *molecule = refreshed;
        molecule.name = name;
    }
    if let Some(energy) = last_float_after(&stdout, "FINAL SINGLE POINT ENERGY") {
        molecule.energy = Some(energy);
    }

    Ok(outcome_from_status(output.status.success(), Backend::Orca, molecule))
}

fn run_psi4(
    dir: &Path,
    molecule: &mut Molecule,
    method: &MethodDescriptor,
) -> Result<OptOutcome, EngineError> {
    let reference = match method.scf_type {
        ScfType::Restricted => "rhf",
        ScfType::Unrestricted => "uhf",
    };
    let mut input = format!("molecule {{\n{} {}\n", method.charge, method.multiplicity);
    push_coordinate_block(&mut input, molecule);
    input.push_str(&format!(
        "}}\n\nset reference {reference}\noptimize('scf/sto-3g')\n"
    ));
    fs::write(dir.join("input.dat"), input)?;

    let output = invoke(
        dir,
        Backend::Psi4,
        Command::new("psi4").arg("input.dat").arg("output.dat"),
    )?;

    if let Ok(text) = fs::read_to_string(dir.join("output.dat")) {
        if let Some(energy) = last_float_after(&text, "Final energy is") {
            molecule.energy = Some(energy);
        }
    }

    Ok(outcome_from_status(output.status.success(), Backend::Psi4, molecule))
}

fn run_mopac(
    dir: &Path,
    molecule: &mut Molecule,
    method: &MethodDescriptor,
) -> Result<OptOutcome, EngineError> {
    let spin = match method.multiplicity {
        1 => "SINGLET",
        2 => "DOUBLET",
        3 => "TRIPLET",
        4 => "QUARTET",
        _ => "QUINTET",
    };
    let uhf = match method.scf_type {
        ScfType::Restricted => "",
        ScfType::Unrestricted => " UHF",
    };
    let mut input = format!(
        "PM7 CHARGE={} {spin}{uhf}\n{}\n\n",
        method.charge, molecule.name
    );
    for (symbol, point) in molecule.symbols().iter().zip(molecule.coordinates()) {
        input.push_str(&format!(
            "{symbol} {:.8} 1 {:.8} 1 {:.8} 1\n",
            point.x, point.y, point.z
        ));
    }
    fs::write(dir.join("job.mop"), input)?;

    let output = invoke(dir, Backend::Mopac, Command::new("mopac").arg("job.mop"))?;

    if let Ok(text) = fs::read_to_string(dir.join("job.out")) {
        if let Some(energy) = last_float_after(&text, "TOTAL ENERGY") {
            molecule.energy = Some(energy);
        }
    }

    Ok(outcome_from_status(output.status.success(), Backend::Mopac, molecule))
}

fn run_gaussian(
    dir: &Path,
    molecule: &mut Molecule,
    method: &MethodDescriptor,
) -> Result<OptOutcome, EngineError> {
    let mut input = format!(
        "# PM6 Opt\n\n{}\n\n{} {}\n",
        molecule.name, method.charge, method.multiplicity
    );
    push_coordinate_block(&mut input, molecule);
    input.push('\n');
    fs::write(dir.join("job.gjf"), input)?;

    let output = invoke(dir, Backend::Gaussian, Command::new("g16").arg("job.gjf"))?;

    if let Ok(text) = fs::read_to_string(dir.join("job.log")) {
        if let Some(energy) = last_float_after(&text, "SCF Done:") {
            molecule.energy = Some(energy);
        }
    }

    Ok(outcome_from_status(output.status.success(), Backend::Gaussian, molecule))
}

fn push_coordinate_block(input: &mut String, molecule: &Molecule) {
    for (symbol, point) in molecule.symbols().iter().zip(molecule.coordinates()) {
        input.push_str(&format!(
            "{symbol} {:.8} {:.8} {:.8}\n",
            point.x, point.y, point.z
        ));
    }
}

fn outcome_from_status(success: bool, backend: Backend, molecule: &Molecule) -> OptOutcome {
    if success {
        OptOutcome::Converged
    } else {
        warn!("{backend} optimisation of '{}' failed", molecule.name);
        OptOutcome::Failed
    }
}

/// Last floating-point token on any line containing `marker`.
fn last_float_after(text: &str, marker: &str) -> Option<f64> {
    text.lines()
        .filter(|line| line.contains(marker))
        .filter_map(|line| {
            line.split_whitespace()
                .filter_map(|token| token.parse::<f64>().ok())
                .next_back()
        })
        .next_back()
}
