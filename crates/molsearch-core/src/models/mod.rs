pub mod elements;
pub mod molecule;

pub use molecule::{Molecule, XyzError, XyzParseErrorKind};
