//! Resolution of contig names to canonical chromosomes.

use crate::pbs::Chromosome;

/// Accepted contig names, in wire order of `Chromosome`.
pub const CHROMS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "MT",
];

/// Resolve a contig name to its canonical chromosome.
///
/// Matching is exact: no case folding and no `chr` prefix.  Returns `None`
/// for anything else.
pub fn resolve(name: &str) -> Option<Chromosome> {
    CHROMS
        .iter()
        .position(|&chrom| chrom == name)
        .and_then(|idx| Chromosome::try_from(idx as i32 + 1).ok())
}

/// Batch version of `resolve()`.
pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Vec<Option<Chromosome>> {
    names.iter().map(|name| resolve(name.as_ref())).collect()
}

impl Chromosome {
    /// Contig name as accepted by `resolve()`, empty for `Unspecified`.
    pub fn name(&self) -> &'static str {
        usize::try_from(i32::from(*self) - 1)
            .ok()
            .and_then(|idx| CHROMS.get(idx))
            .copied()
            .unwrap_or_default()
    }

    /// Whether this is one of the autosomes 1 to 22.
    pub fn is_autosome(&self) -> bool {
        !matches!(
            self,
            Chromosome::Unspecified | Chromosome::ChrX | Chromosome::ChrY | Chromosome::ChrMt
        )
    }
}
