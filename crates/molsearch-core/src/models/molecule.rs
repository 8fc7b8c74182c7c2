use super::elements;
use nalgebra::{Point3, Rotation3, Vector3};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Errors raised while constructing a [`Molecule`] from XYZ data.
#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },

    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XyzParseErrorKind {
    #[error("invalid atom count '{0}'")]
    InvalidAtomCount(String),

    #[error("expected an element symbol followed by three coordinates")]
    MalformedAtomLine,

    #[error("invalid coordinate value '{0}'")]
    InvalidCoordinate(String),

    #[error("file ends before the declared {expected} atoms (found {found})")]
    TruncatedAtomBlock { expected: usize, found: usize },
}

/// An immutable molecular geometry.
///
/// A `Molecule` is loaded once per input path and then shared read-only by
/// the campaign layer; the generation engines derive new `Molecule` values
/// instead of mutating their inputs. The per-atom covalent radii are resolved
/// at construction time so downstream code never has to consult the element
/// table again.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub name: String,
    /// Electronic energy from the most recent optimisation, if any.
    pub energy: Option<f64>,
    symbols: Vec<String>,
    coordinates: Vec<Point3<f64>>,
    radii: Vec<f64>,
}

impl Molecule {
    /// Builds a molecule from parallel symbol and coordinate arrays.
    ///
    /// Fails if any element symbol is not in the covalent radius table.
    pub fn new(
        name: impl Into<String>,
        symbols: Vec<String>,
        coordinates: Vec<Point3<f64>>,
    ) -> Result<Self, XyzError> {
        debug_assert_eq!(symbols.len(), coordinates.len());
        let radii = symbols
            .iter()
            .map(|s| {
                elements::covalent_radius(s).ok_or_else(|| XyzError::UnknownElement(s.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            energy: None,
            symbols,
            coordinates,
            radii,
        })
    }

    /// Reads a molecule from an XYZ coordinate file.
    ///
    /// The molecule is named after the file stem. If the comment line carries
    /// an energy (either as its first token or after an `energy:` marker, as
    /// xtb writes it), the energy is captured.
    pub fn from_xyz_path(path: impl AsRef<Path>) -> Result<Self, XyzError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "molecule".to_string());
        let file = File::open(path)?;
        Self::from_xyz_reader(name, BufReader::new(file))
    }

    /// Reads a molecule in XYZ format from any buffered reader.
    pub fn from_xyz_reader(
        name: impl Into<String>,
        reader: impl BufRead,
    ) -> Result<Self, XyzError> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.unwrap_or_default();
        let expected: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidAtomCount(count_line.trim().to_string()),
        })?;

        let comment = lines.next().transpose()?.unwrap_or_default();
        let energy = parse_comment_energy(&comment);

        let mut symbols = Vec::with_capacity(expected);
        let mut coordinates = Vec::with_capacity(expected);
        for (offset, line) in lines.take(expected).enumerate() {
            let line = line?;
            let line_number = offset + 3;
            let mut fields = line.split_whitespace();
            let symbol = fields.next().ok_or(XyzError::Parse {
                line: line_number,
                kind: XyzParseErrorKind::MalformedAtomLine,
            })?;
            let mut axis = [0.0f64; 3];
            for slot in axis.iter_mut() {
                let field = fields.next().ok_or(XyzError::Parse {
                    line: line_number,
                    kind: XyzParseErrorKind::MalformedAtomLine,
                })?;
                *slot = field.parse().map_err(|_| XyzError::Parse {
                    line: line_number,
                    kind: XyzParseErrorKind::InvalidCoordinate(field.to_string()),
                })?;
            }
            symbols.push(symbol.to_string());
            coordinates.push(Point3::new(axis[0], axis[1], axis[2]));
        }

        if symbols.len() != expected {
            return Err(XyzError::Parse {
                line: symbols.len() + 2,
                kind: XyzParseErrorKind::TruncatedAtomBlock {
                    expected,
                    found: symbols.len(),
                },
            });
        }

        let mut molecule = Self::new(name, symbols, coordinates)?;
        molecule.energy = energy;
        Ok(molecule)
    }

    pub fn atom_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn coordinates(&self) -> &[Point3<f64>] {
        &self.coordinates
    }

    /// Covalent radius of atom `index` in Angstroms.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; callers that receive indices from
    /// user input must bounds-check first.
    pub fn covalent_radius(&self, index: usize) -> f64 {
        self.radii[index]
    }

    /// Distance between atoms `a` and `b` in Angstroms.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        (self.coordinates[a] - self.coordinates[b]).norm()
    }

    /// Geometric centre of the atom positions.
    pub fn centroid(&self) -> Point3<f64> {
        let sum: Vector3<f64> = self
            .coordinates
            .iter()
            .map(|p| p.coords)
            .sum::<Vector3<f64>>();
        Point3::from(sum / self.atom_count().max(1) as f64)
    }

    /// Effective spherical extent: the largest centroid-to-atom distance plus
    /// that atom's covalent radius. Used to place fragments at contact
    /// distance during orientation generation.
    pub fn extent(&self) -> f64 {
        let centroid = self.centroid();
        self.coordinates
            .iter()
            .zip(&self.radii)
            .map(|(p, r)| (p - centroid).norm() + r)
            .fold(0.0, f64::max)
    }

    /// Returns a copy rotated rigidly about its own centroid and re-centred
    /// at `centre`.
    pub fn oriented(&self, rotation: &Rotation3<f64>, centre: Point3<f64>) -> Self {
        let own_centre = self.centroid();
        let mut copy = self.clone();
        for point in &mut copy.coordinates {
            *point = centre + rotation * (*point - own_centre);
        }
        copy.energy = None;
        copy
    }

    /// Rigidly shifts the atoms in `range` by `shift`.
    ///
    /// Used by engines that move one fragment of a combined structure while
    /// holding the other fixed.
    pub fn translate_atoms(&mut self, range: Range<usize>, shift: &Vector3<f64>) {
        for point in &mut self.coordinates[range] {
            *point += shift;
        }
        self.energy = None;
    }

    /// Concatenates two molecules into one structure.
    ///
    /// Atoms of `first` keep their indices; atoms of `second` are renumbered
    /// starting at `first.atom_count()`. This is the combined index space
    /// that site pairs for two-molecule campaigns refer to.
    pub fn merged(name: impl Into<String>, first: &Self, second: &Self) -> Self {
        let mut symbols = first.symbols.clone();
        symbols.extend_from_slice(&second.symbols);
        let mut coordinates = first.coordinates.clone();
        coordinates.extend_from_slice(&second.coordinates);
        let mut radii = first.radii.clone();
        radii.extend_from_slice(&second.radii);
        Self {
            name: name.into(),
            energy: None,
            symbols,
            coordinates,
            radii,
        }
    }

    /// Renders the molecule in XYZ format.
    pub fn to_xyz_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.atom_count());
        match self.energy {
            Some(energy) => {
                let _ = writeln!(out, "{}  energy: {:.8}", self.name, energy);
            }
            None => {
                let _ = writeln!(out, "{}", self.name);
            }
        }
        for (symbol, point) in self.symbols.iter().zip(&self.coordinates) {
            let _ = writeln!(
                out,
                "{:<3} {:>14.8} {:>14.8} {:>14.8}",
                symbol, point.x, point.y, point.z
            );
        }
        out
    }

    /// Writes the molecule to `path` in XYZ format.
    pub fn write_xyz(&self, path: impl AsRef<Path>) -> Result<(), XyzError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_xyz_string().as_bytes())?;
        Ok(())
    }
}

fn parse_comment_energy(comment: &str) -> Option<f64> {
    let mut tokens = comment.split_whitespace();
    let first = tokens.next()?;
    if let Ok(value) = first.parse::<f64>() {
        return Some(value);
    }
    let mut tokens = comment.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "energy:" {
            return tokens.next()?.parse().ok();
        }
    }
    None
}
