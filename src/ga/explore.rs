//! Canonical form of the explored search space.
//!
//! The grade code of an excluded course has no effect on fitness, so two
//! chromosomes that differ only there describe the same plan. The canonical
//! form blanks out excluded loci before deduplicating.

use std::collections::BTreeSet;

/// A chromosome with excluded courses blanked to `None` (flag and grade).
pub type CanonicalPlan = Vec<Option<u8>>;

/// Deduplicates explored chromosomes by their effective course/grade
/// assignment.
///
/// Any trailing odd gene is kept as is.
pub fn canonicalize_explored(explored: &[Vec<u8>]) -> BTreeSet<CanonicalPlan> {
    let distinct: BTreeSet<&[u8]> = explored.iter().map(Vec::as_slice).collect();
    distinct.into_iter().map(canonicalize).collect()
}

/// Blanks every excluded `(flag, grade)` pair of one chromosome.
pub fn canonicalize(data: &[u8]) -> CanonicalPlan {
    let mut out: CanonicalPlan = data.iter().copied().map(Some).collect();
    for gene in out.chunks_exact_mut(2) {
        if gene[0] == Some(0) {
            gene[0] = None;
            gene[1] = None;
        }
    }
    out
}
