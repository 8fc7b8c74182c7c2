use crate::models::Molecule;

/// An atom pair addressed in the combined index space of two molecules.
///
/// The generation engines treat a two-molecule interaction as a single
/// structure whose atoms are numbered first-molecule-first, so any atom index
/// that refers to the second molecule must be shifted by the first molecule's
/// atom count. Constructing a `SitePair` through [`SitePair::across`] is the
/// only place that shift happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitePair {
    /// Index into the first molecule, unchanged.
    pub first: usize,
    /// Index into the combined structure: the requested second-molecule index
    /// plus the first molecule's atom count.
    pub second: usize,
}

impl SitePair {
    /// Lifts a raw `(a, b)` pair, where `a` indexes the first molecule and
    /// `b` indexes the second, into the combined index space.
    pub fn across(first_molecule: &Molecule, pair: (usize, usize)) -> Self {
        Self {
            first: pair.0,
            second: first_molecule.atom_count() + pair.1,
        }
    }

    pub fn as_tuple(self) -> (usize, usize) {
        (self.first, self.second)
    }
}
