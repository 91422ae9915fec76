//! Reference signature matcher.

use facegate_types::Signature;

use crate::SignatureMatcher;

/// Distance at or below which two signatures are the same face.
pub const DEFAULT_TOLERANCE: f64 = 0.6;

/// Flags every reference within `tolerance` (Euclidean distance) of the
/// query. Lower tolerances are stricter. References of a different
/// dimensionality never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMatcher {
    tolerance: f64,
}

impl DistanceMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for DistanceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl SignatureMatcher for DistanceMatcher {
    fn compare(&self, query: &Signature, references: &[Signature]) -> Vec<bool> {
        references
            .iter()
            .map(|reference| {
                query
                    .distance(reference)
                    .is_some_and(|distance| distance <= self.tolerance)
            })
            .collect()
    }
}
