pub mod parallel;

use crate::crypto::curve::constants::ED25519_BASEPOINT_POINT;
use crate::crypto::curve::{AffineNielsPoint, EdwardsPoint, Identity, ValidityCheck};
use subtle::{Choice, ConditionallyNegatable, ConstantTimeEq};

/// A group-law consistency check that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub worker: usize,
    pub step: u64,
    pub check: &'static str,
}

/// Summary of a finished self-test run.
#[derive(Debug, Clone)]
pub struct SelftestStats {
    pub threads: usize,
    pub total_steps: u64,
    pub total_checks: u64,
    pub elapsed_nanos: u128,
    pub failures: Vec<CheckFailure>,
}

impl SelftestStats {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Names of the checks run against every point of a chain, in order.
pub const CHECK_NAMES: [&str; 9] = [
    "point on curve",
    "double equals self-add",
    "projective niels add/sub round trip",
    "affine niels add/sub round trip",
    "affine niels conversion",
    "raw table encoding",
    "identity is neutral",
    "conditional negate",
    "mul_by_pow_2 equals repeated doubling",
];

/// Run every group-law check against `point`, returning the names of those
/// that fail.
pub fn check_point(point: &EdwardsPoint) -> Vec<&'static str> {
    let basepoint = &*ED25519_BASEPOINT_POINT;
    let identity = EdwardsPoint::identity();
    let mut failed = Vec::new();

    let results = [
        point.is_valid() && point.as_projective().is_valid(),
        point.double() == point + point,
        {
            let niels = basepoint.as_projective_niels();
            let sum = EdwardsPoint::from(&(point + &niels));
            EdwardsPoint::from(&(&sum - &niels)) == *point
        },
        {
            let niels = basepoint.as_affine_niels();
            let sum = EdwardsPoint::from(&(point + &niels));
            EdwardsPoint::from(&(&sum - &niels)) == *point
        },
        EdwardsPoint::from(&point.as_affine_niels()) == *point,
        {
            let niels = point.as_affine_niels();
            AffineNielsPoint::from_raw(&niels.to_raw()) == niels
        },
        point + &identity == *point && bool::from((point - point).ct_eq(&identity)),
        {
            let mut negated = point.as_projective_niels();
            negated.conditional_negate(Choice::from(1));
            let cancelled = EdwardsPoint::from(&(point + &negated));
            let mut unchanged = point.as_affine_niels();
            unchanged.conditional_negate(Choice::from(0));
            cancelled == identity && unchanged == point.as_affine_niels()
        },
        point.mul_by_pow_2(3) == point.double().double().double(),
    ];

    for (name, ok) in CHECK_NAMES.iter().zip(results) {
        if !ok {
            failed.push(*name);
        }
    }

    failed
}

/// The point `n·B`, by repeated addition.
pub fn basepoint_multiple(n: u64) -> EdwardsPoint {
    let basepoint = &*ED25519_BASEPOINT_POINT;
    (0..n).map(|_| basepoint).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_point_passes_on_small_multiples() {
        for n in 0..6 {
            let point = basepoint_multiple(n);
            assert!(check_point(&point).is_empty(), "checks failed for {n}B");
        }
    }

    #[test]
    fn test_check_point_flags_off_curve_point() {
        // (1, 1) is not on the curve: -1 + 1 != 1 + d.
        use crate::crypto::curve::FieldElement;
        let bogus = EdwardsPoint::from_affine(&FieldElement::ONE, &FieldElement::ONE);
        let failed = check_point(&bogus);
        assert!(failed.contains(&"point on curve"));
    }

    #[test]
    fn test_basepoint_multiple() {
        assert_eq!(basepoint_multiple(0), EdwardsPoint::identity());
        assert_eq!(basepoint_multiple(1), *ED25519_BASEPOINT_POINT);
        assert_eq!(basepoint_multiple(4), ED25519_BASEPOINT_POINT.mul_by_pow_2(2));
    }

    #[test]
    fn test_stats_passed() {
        let mut stats = SelftestStats {
            threads: 2,
            total_steps: 10,
            total_checks: 90,
            elapsed_nanos: 1_000,
            failures: Vec::new(),
        };
        assert!(stats.passed());

        stats.failures.push(CheckFailure {
            worker: 1,
            step: 3,
            check: CHECK_NAMES[0],
        });
        assert!(!stats.passed());
    }
}
