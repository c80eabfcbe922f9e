//! Internal curve representations and the mixed-model group law.
//!
//! # Curve representations
//!
//! Begin with the affine equation for the curve,
//! $$
//!     -x\^2 + y\^2 = 1 + dx\^2y\^2.
//! $$
//! Passing to the projective closure \\(\mathbb P\^1 \times \mathbb P\^1\\)
//! by setting \\(x=X/Z\\), \\(y=Y/T\\) gives the `CompletedPoint` model;
//! the Segre embedding of that product into \\(\mathbb P\^3\\) is the
//! "extended" model of Hisil, Wong, Carter and Dawson, represented by
//! [`EdwardsPoint`]; dropping the first coordinate gives the
//! \\(\mathbb P\^2\\) model of Bernstein, Birkner, Joye, Lange and Peters,
//! represented by `ProjectivePoint`.
//!
//! The \\(\mathbb P\^3\\) model has the faster addition formulas and the
//! \\(\mathbb P\^2\\) model the faster doubling.  As in `ref10`, every
//! addition or doubling here lands in \\(\mathbb P\^1 \times \mathbb P\^1\\),
//! and the caller chooses whether to fold the `CompletedPoint` into
//! \\(\mathbb P\^2\\) (another doubling follows) or \\(\mathbb P\^3\\)
//! (an addition follows).  No formula performs an inversion.
//!
//! To accelerate readditions, two cached formats in "Niels coordinates"
//! are provided:
//!
//! * `AffineNielsPoint`: \\( (y+x, y-x, 2dxy) \\)
//! * `ProjectiveNielsPoint`: \\( (Y+X, Y-X, Z, 2dXY) \\)
//!
//! Both support constant-time selection and negation, which is what a
//! table-driven scalar multiplication needs to fetch a secret-indexed entry.

#![allow(non_snake_case)]

use core::array::TryFromSliceError;
use core::ops::{Add, Neg, Sub};

use subtle::{Choice, ConditionallySelectable};

use super::constants;
use super::edwards::EdwardsPoint;
use super::field::FieldElement;
use super::traits::{Identity, ValidityCheck};

/// Length of the raw encoding of an [`AffineNielsPoint`] in a precomputed
/// basepoint table.
pub const AFFINE_NIELS_RAW_LENGTH: usize = 96;

// ------------------------------------------------------------------------
// Internal point representations
// ------------------------------------------------------------------------

/// A `ProjectivePoint` is a point \\((X:Y:Z)\\) on the \\(\mathbb
/// P\^2\\) model of the curve.
/// A point \\((x,y)\\) in the affine model corresponds to
/// \\((x:y:1)\\).
#[derive(Copy, Clone, Debug)]
pub struct ProjectivePoint {
    pub X: FieldElement,
    pub Y: FieldElement,
    pub Z: FieldElement,
}

/// A `CompletedPoint` is a point \\(((X:Z), (Y:T))\\) on the \\(\mathbb
/// P\^1 \times \mathbb P\^1 \\) model of the curve.
/// A point (x,y) in the affine model corresponds to \\( ((x:1),(y:1))
/// \\).
///
/// Only produced by the doubling and addition formulas below.
#[derive(Copy, Clone, Debug)]
pub struct CompletedPoint {
    pub X: FieldElement,
    pub Y: FieldElement,
    pub Z: FieldElement,
    pub T: FieldElement,
}

/// A pre-computed point in the affine model for the curve, represented as
/// \\((y+x, y-x, 2dxy)\\) in "Niels coordinates".
// Safe to derive Eq because affine coordinates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AffineNielsPoint {
    pub y_plus_x: FieldElement,
    pub y_minus_x: FieldElement,
    pub xy2d: FieldElement,
}

/// A pre-computed point on the \\( \mathbb P\^3 \\) model for the
/// curve, represented as \\((Y+X, Y-X, Z, 2dXY)\\) in "Niels coordinates".
#[derive(Copy, Clone, Debug)]
pub struct ProjectiveNielsPoint {
    pub Y_plus_X: FieldElement,
    pub Y_minus_X: FieldElement,
    pub Z: FieldElement,
    pub T2d: FieldElement,
}

// ------------------------------------------------------------------------
// Constructors
// ------------------------------------------------------------------------

impl Identity for ProjectivePoint {
    fn identity() -> ProjectivePoint {
        ProjectivePoint {
            X: FieldElement::ZERO,
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
        }
    }
}

impl Identity for ProjectiveNielsPoint {
    fn identity() -> ProjectiveNielsPoint {
        ProjectiveNielsPoint {
            Y_plus_X: FieldElement::ONE,
            Y_minus_X: FieldElement::ONE,
            Z: FieldElement::ONE,
            T2d: FieldElement::ZERO,
        }
    }
}

impl Default for ProjectiveNielsPoint {
    fn default() -> ProjectiveNielsPoint {
        ProjectiveNielsPoint::identity()
    }
}

impl Identity for AffineNielsPoint {
    fn identity() -> AffineNielsPoint {
        AffineNielsPoint {
            y_plus_x: FieldElement::ONE,
            y_minus_x: FieldElement::ONE,
            xy2d: FieldElement::ZERO,
        }
    }
}

impl Default for AffineNielsPoint {
    fn default() -> AffineNielsPoint {
        AffineNielsPoint::identity()
    }
}

impl AffineNielsPoint {
    /// Decode a precomputed table entry: three consecutive 32-byte
    /// little-endian field elements, \\(y+x\\), \\(y-x\\), \\(2dxy\\).
    ///
    /// Nothing is validated; this is meant only for trusted table constants.
    pub fn from_raw(raw: &[u8; AFFINE_NIELS_RAW_LENGTH]) -> AffineNielsPoint {
        let field_at = |offset: usize| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&raw[offset..offset + 32]);
            FieldElement::from_bytes(&bytes)
        };
        AffineNielsPoint {
            y_plus_x: field_at(0),
            y_minus_x: field_at(32),
            xy2d: field_at(64),
        }
    }

    /// Encode this point in the precomputed table layout read by
    /// [`AffineNielsPoint::from_raw`].
    pub fn to_raw(&self) -> [u8; AFFINE_NIELS_RAW_LENGTH] {
        let mut raw = [0u8; AFFINE_NIELS_RAW_LENGTH];
        raw[..32].copy_from_slice(&self.y_plus_x.to_bytes());
        raw[32..64].copy_from_slice(&self.y_minus_x.to_bytes());
        raw[64..].copy_from_slice(&self.xy2d.to_bytes());
        raw
    }
}

impl TryFrom<&[u8]> for AffineNielsPoint {
    type Error = TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<AffineNielsPoint, TryFromSliceError> {
        let raw: &[u8; AFFINE_NIELS_RAW_LENGTH] = slice.try_into()?;
        Ok(AffineNielsPoint::from_raw(raw))
    }
}

// ------------------------------------------------------------------------
// Validity checks (for debugging, not CT)
// ------------------------------------------------------------------------

impl ValidityCheck for ProjectivePoint {
    fn is_valid(&self) -> bool {
        // Curve equation is    -x^2 + y^2 = 1 + d*x^2*y^2,
        // homogenized as (-X^2 + Y^2)*Z^2 = Z^4 + d*X^2*Y^2
        let XX = self.X.square();
        let YY = self.Y.square();
        let ZZ = self.Z.square();
        let ZZZZ = ZZ.square();
        let lhs = &(&YY - &XX) * &ZZ;
        let rhs = &ZZZZ + &(&*constants::EDWARDS_D * &(&XX * &YY));

        lhs == rhs
    }
}

// ------------------------------------------------------------------------
// Constant-time assignment
// ------------------------------------------------------------------------

impl ConditionallySelectable for ProjectiveNielsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectiveNielsPoint {
            Y_plus_X: FieldElement::conditional_select(&a.Y_plus_X, &b.Y_plus_X, choice),
            Y_minus_X: FieldElement::conditional_select(&a.Y_minus_X, &b.Y_minus_X, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
            T2d: FieldElement::conditional_select(&a.T2d, &b.T2d, choice),
        }
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.Y_plus_X.conditional_assign(&other.Y_plus_X, choice);
        self.Y_minus_X.conditional_assign(&other.Y_minus_X, choice);
        self.Z.conditional_assign(&other.Z, choice);
        self.T2d.conditional_assign(&other.T2d, choice);
    }
}

impl ConditionallySelectable for AffineNielsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffineNielsPoint {
            y_plus_x: FieldElement::conditional_select(&a.y_plus_x, &b.y_plus_x, choice),
            y_minus_x: FieldElement::conditional_select(&a.y_minus_x, &b.y_minus_x, choice),
            xy2d: FieldElement::conditional_select(&a.xy2d, &b.xy2d, choice),
        }
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        self.y_plus_x.conditional_assign(&other.y_plus_x, choice);
        self.y_minus_x.conditional_assign(&other.y_minus_x, choice);
        self.xy2d.conditional_assign(&other.xy2d, choice);
    }
}

// ------------------------------------------------------------------------
// Point conversions
// ------------------------------------------------------------------------

impl ProjectivePoint {
    /// Convert this point from the \\( \mathbb P\^2 \\) model to the
    /// \\( \mathbb P\^3 \\) model.
    ///
    /// This costs \\(3 \mathrm M + 1 \mathrm S\\).
    pub fn as_extended(&self) -> EdwardsPoint {
        EdwardsPoint {
            X: &self.X * &self.Z,
            Y: &self.Y * &self.Z,
            Z: self.Z.square(),
            T: &self.X * &self.Y,
        }
    }
}

impl CompletedPoint {
    /// Convert this point from the \\( \mathbb P\^1 \times \mathbb P\^1
    /// \\) model to the \\( \mathbb P\^2 \\) model.
    ///
    /// This costs \\(3 \mathrm M \\).
    pub fn as_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            X: &self.X * &self.T,
            Y: &self.Y * &self.Z,
            Z: &self.Z * &self.T,
        }
    }

    /// Convert this point from the \\( \mathbb P\^1 \times \mathbb P\^1
    /// \\) model to the \\( \mathbb P\^3 \\) model.
    ///
    /// This costs \\(4 \mathrm M \\).
    pub fn as_extended(&self) -> EdwardsPoint {
        EdwardsPoint {
            X: &self.X * &self.T,
            Y: &self.Y * &self.Z,
            Z: &self.Z * &self.T,
            T: &self.X * &self.Y,
        }
    }
}

// ------------------------------------------------------------------------
// Doubling
// ------------------------------------------------------------------------

impl ProjectivePoint {
    /// Double this point: return self + self
    pub fn double(&self) -> CompletedPoint {
        // Double()
        let XX = self.X.square();
        let YY = self.Y.square();
        let ZZ2 = self.Z.square2();
        let X_plus_Y = &self.X + &self.Y;
        let X_plus_Y_sq = X_plus_Y.square();
        let YY_plus_XX = &YY + &XX;
        let YY_minus_XX = &YY - &XX;

        CompletedPoint {
            X: &X_plus_Y_sq - &YY_plus_XX,
            Y: YY_plus_XX,
            Z: YY_minus_XX,
            T: &ZZ2 - &YY_minus_XX,
        }
    }
}

// ------------------------------------------------------------------------
// Addition and Subtraction
// ------------------------------------------------------------------------

impl<'b> Add<&'b ProjectiveNielsPoint> for &EdwardsPoint {
    type Output = CompletedPoint;

    fn add(self, other: &'b ProjectiveNielsPoint) -> CompletedPoint {
        let Y_plus_X = &self.Y + &self.X;
        let Y_minus_X = &self.Y - &self.X;
        let PP = &Y_plus_X * &other.Y_plus_X;
        let MM = &Y_minus_X * &other.Y_minus_X;
        let TT2d = &self.T * &other.T2d;
        let ZZ = &self.Z * &other.Z;
        let ZZ2 = &ZZ + &ZZ;

        CompletedPoint {
            X: &PP - &MM,
            Y: &PP + &MM,
            Z: &ZZ2 + &TT2d,
            T: &ZZ2 - &TT2d,
        }
    }
}

impl<'b> Sub<&'b ProjectiveNielsPoint> for &EdwardsPoint {
    type Output = CompletedPoint;

    fn sub(self, other: &'b ProjectiveNielsPoint) -> CompletedPoint {
        let Y_plus_X = &self.Y + &self.X;
        let Y_minus_X = &self.Y - &self.X;
        let PM = &Y_plus_X * &other.Y_minus_X;
        let MP = &Y_minus_X * &other.Y_plus_X;
        let TT2d = &self.T * &other.T2d;
        let ZZ = &self.Z * &other.Z;
        let ZZ2 = &ZZ + &ZZ;

        CompletedPoint {
            X: &PM - &MP,
            Y: &PM + &MP,
            Z: &ZZ2 - &TT2d,
            T: &ZZ2 + &TT2d,
        }
    }
}

impl<'b> Add<&'b AffineNielsPoint> for &EdwardsPoint {
    type Output = CompletedPoint;

    fn add(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        let Y_plus_X = &self.Y + &self.X;
        let Y_minus_X = &self.Y - &self.X;
        let PP = &Y_plus_X * &other.y_plus_x;
        let MM = &Y_minus_X * &other.y_minus_x;
        let Txy2d = &self.T * &other.xy2d;
        let Z2 = &self.Z + &self.Z;

        CompletedPoint {
            X: &PP - &MM,
            Y: &PP + &MM,
            Z: &Z2 + &Txy2d,
            T: &Z2 - &Txy2d,
        }
    }
}

impl<'b> Sub<&'b AffineNielsPoint> for &EdwardsPoint {
    type Output = CompletedPoint;

    fn sub(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        let Y_plus_X = &self.Y + &self.X;
        let Y_minus_X = &self.Y - &self.X;
        let PM = &Y_plus_X * &other.y_minus_x;
        let MP = &Y_minus_X * &other.y_plus_x;
        let Txy2d = &self.T * &other.xy2d;
        let Z2 = &self.Z + &self.Z;

        CompletedPoint {
            X: &PM - &MP,
            Y: &PM + &MP,
            Z: &Z2 - &Txy2d,
            T: &Z2 + &Txy2d,
        }
    }
}

/// Folds the completed operand back into the \\( \mathbb P\^3 \\) model
/// first, so a chain of doublings can feed a table addition directly.
impl<'b> Add<&'b AffineNielsPoint> for &CompletedPoint {
    type Output = CompletedPoint;

    fn add(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        &self.as_extended() + other
    }
}

impl<'b> Sub<&'b AffineNielsPoint> for &CompletedPoint {
    type Output = CompletedPoint;

    fn sub(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        &self.as_extended() - other
    }
}

// ------------------------------------------------------------------------
// Negation
// ------------------------------------------------------------------------

// Negating \\((x, y)\\) gives \\((-x, y)\\): the sum and difference swap
// places and the cross term changes sign.  With `ConditionallySelectable`
// this also provides `subtle::ConditionallyNegatable`.

impl Neg for &ProjectiveNielsPoint {
    type Output = ProjectiveNielsPoint;

    fn neg(self) -> ProjectiveNielsPoint {
        ProjectiveNielsPoint {
            Y_plus_X: self.Y_minus_X,
            Y_minus_X: self.Y_plus_X,
            Z: self.Z,
            T2d: -(&self.T2d),
        }
    }
}

impl Neg for &AffineNielsPoint {
    type Output = AffineNielsPoint;

    fn neg(self) -> AffineNielsPoint {
        AffineNielsPoint {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            xy2d: -(&self.xy2d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::constants::ED25519_BASEPOINT_POINT;
    use subtle::{ConditionallyNegatable, ConstantTimeEq};

    /// Affine coordinates of [k]B for k = 2..=5, computed independently with
    /// big-integer arithmetic on the affine addition law.
    const MULTIPLES: [(&str, &str); 4] = [
        (
            "0ece43284ea1c5835fa4d715458e0d08ace733187d3b043d6c045a9f4c38ab36",
            "c9a3f86aae465f0e56513864510f3997561fa2c9e85ea21dc2292309f3cd6022",
        ),
        (
            "5ce2f8d35f4862ac86486281199843633ac8da3e74aef41f498f92224a9cae67",
            "d4b4f5784868c3020403246717ec169ff79e26608ea126a1ab69ee77d1b16712",
        ),
        (
            "70f8c9c457a63a494715ce93c19e731af920357ab8d4258346f1cf56dba83d20",
            "2f1132ca61ab38dff00f2fea3228f24c6c71d58085b80e47e19515cb27e8d047",
        ),
        (
            "33f22e32c09c4091a5e11b3ef919285cdea52dd1f77ceffc7b58e3ad3ea7fd49",
            "edc876d6831fd2105d0b4389ca2e283166469289146e2ce06faefe98b225485f",
        ),
    ];

    fn fe(hex_str: &str) -> FieldElement {
        FieldElement::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
    }

    /// [k]B for k in 1..=5, from the reference table.
    fn multiple(k: usize) -> EdwardsPoint {
        if k == 1 {
            return *ED25519_BASEPOINT_POINT;
        }
        let (x, y) = MULTIPLES[k - 2];
        EdwardsPoint::from_affine(&fe(x), &fe(y))
    }

    /// Same group element, with every coordinate scaled by `lambda`.
    fn rescale(p: &EdwardsPoint, lambda: u64) -> EdwardsPoint {
        let l = FieldElement::from_u64(lambda);
        EdwardsPoint {
            X: &p.X * &l,
            Y: &p.Y * &l,
            Z: &p.Z * &l,
            T: &p.T * &l,
        }
    }

    fn assert_affine(p: &EdwardsPoint, k: usize) {
        assert!(p.is_valid());
        let (x, y) = p.to_affine();
        let (ex, ey) = multiple(k).to_affine();
        assert_eq!(x, ex, "x-coordinate of [{k}]B");
        assert_eq!(y, ey, "y-coordinate of [{k}]B");
    }

    fn niels_eq(a: &ProjectiveNielsPoint, b: &ProjectiveNielsPoint) -> bool {
        a.Y_plus_X == b.Y_plus_X && a.Y_minus_X == b.Y_minus_X && a.Z == b.Z && a.T2d == b.T2d
    }

    #[test]
    fn reference_multiples_are_on_curve() {
        for k in 1..=5 {
            assert!(multiple(k).is_valid(), "[{k}]B");
        }
    }

    #[test]
    fn double_projective_matches_reference() {
        for lambda in [1u64, 7, 0xdead_beef] {
            let P = rescale(&multiple(1), lambda).as_projective();
            assert!(P.is_valid());
            assert_affine(&P.double().as_extended(), 2);
        }
        let P2 = rescale(&multiple(2), 3).as_projective();
        assert_affine(&P2.double().as_extended(), 4);
    }

    #[test]
    fn double_via_projective_fold() {
        // Two doublings staying in P^2 between them.
        let B = multiple(1).as_projective();
        let four_b = B.double().as_projective().double().as_extended();
        assert_affine(&four_b, 4);
    }

    #[test]
    fn add_sub_projective_niels() {
        let b = rescale(&multiple(1), 11);
        let two_b = rescale(&multiple(2), 5).as_projective_niels();
        assert_affine(&(&b + &two_b).as_extended(), 3);

        let five_b = rescale(&multiple(5), 9);
        assert_affine(&(&five_b - &two_b).as_extended(), 3);

        let three_b = multiple(3);
        let zero = (&three_b - &three_b.as_projective_niels()).as_extended();
        assert_eq!(zero, EdwardsPoint::identity());
    }

    #[test]
    fn add_sub_affine_niels() {
        let two_b = rescale(&multiple(2), 13);
        let three_b = multiple(3).as_affine_niels();
        assert_affine(&(&two_b + &three_b).as_extended(), 5);

        let five_b = rescale(&multiple(5), 2);
        let two_b_niels = multiple(2).as_affine_niels();
        assert_affine(&(&five_b - &two_b_niels).as_extended(), 3);
    }

    #[test]
    fn add_sub_completed_affine_niels() {
        let doubled = multiple(1).as_projective().double();
        let three_b = multiple(3).as_affine_niels();
        assert_affine(&(&doubled + &three_b).as_extended(), 5);

        let doubled = multiple(2).as_projective().double();
        let one_b = multiple(1).as_affine_niels();
        assert_affine(&(&doubled - &one_b).as_extended(), 3);
    }

    #[test]
    fn conversions_preserve_group_element() {
        let P = rescale(&multiple(3), 17);
        assert_eq!(P.as_projective().as_extended(), P);

        let C = multiple(2).as_projective().double();
        assert_eq!(C.as_projective().as_extended(), C.as_extended());

        let from_affine_niels = EdwardsPoint::from(&P.as_affine_niels());
        assert_eq!(from_affine_niels, P);
        assert!(from_affine_niels.is_valid());

        let niels = P.as_projective_niels();
        assert!(niels_eq(&niels, &ProjectiveNielsPoint {
            Y_plus_X: &P.Y + &P.X,
            Y_minus_X: &P.Y - &P.X,
            Z: P.Z,
            T2d: &P.T * &*constants::EDWARDS_D2,
        }));
    }

    #[test]
    fn identities_are_neutral() {
        let id = EdwardsPoint::identity();
        assert_eq!(ProjectivePoint::identity().as_extended(), id);
        assert_eq!(EdwardsPoint::from(&AffineNielsPoint::identity()), id);
        assert!(niels_eq(&id.as_projective_niels(), &ProjectiveNielsPoint::identity()));
        assert_eq!(id.as_affine_niels(), AffineNielsPoint::identity());

        let P = rescale(&multiple(4), 3);
        // right identity
        assert_eq!((&P + &ProjectiveNielsPoint::identity()).as_extended(), P);
        assert_eq!((&P + &AffineNielsPoint::identity()).as_extended(), P);
        assert_eq!((&P - &AffineNielsPoint::identity()).as_extended(), P);
        // left identity
        assert_eq!((&id + &P.as_projective_niels()).as_extended(), P);
        assert_eq!((&id + &P.as_affine_niels()).as_extended(), P);
    }

    #[test]
    fn raw_table_entry_layout() {
        let entry = multiple(3).as_affine_niels();
        let raw = entry.to_raw();
        assert_eq!(&raw[..32], &entry.y_plus_x.to_bytes());
        assert_eq!(&raw[32..64], &entry.y_minus_x.to_bytes());
        assert_eq!(&raw[64..], &entry.xy2d.to_bytes());
        assert_eq!(AffineNielsPoint::from_raw(&raw), entry);
        assert_eq!(AffineNielsPoint::try_from(&raw[..]).unwrap(), entry);
        assert!(AffineNielsPoint::try_from(&raw[..95]).is_err());

        let mut identity_raw = [0u8; AFFINE_NIELS_RAW_LENGTH];
        identity_raw[0] = 1;
        identity_raw[32] = 1;
        assert_eq!(AffineNielsPoint::from_raw(&identity_raw), AffineNielsPoint::identity());
    }

    #[test]
    fn conditional_select_and_assign() {
        let a = multiple(2).as_affine_niels();
        let b = multiple(3).as_affine_niels();
        assert_eq!(AffineNielsPoint::conditional_select(&a, &b, Choice::from(0)), a);
        assert_eq!(AffineNielsPoint::conditional_select(&a, &b, Choice::from(1)), b);
        let mut c = a;
        c.conditional_assign(&b, Choice::from(0));
        assert_eq!(c, a);
        c.conditional_assign(&b, Choice::from(1));
        assert_eq!(c, b);

        let pa = rescale(&multiple(2), 3).as_projective_niels();
        let pb = rescale(&multiple(3), 4).as_projective_niels();
        assert!(niels_eq(&ProjectiveNielsPoint::conditional_select(&pa, &pb, Choice::from(0)), &pa));
        assert!(niels_eq(&ProjectiveNielsPoint::conditional_select(&pa, &pb, Choice::from(1)), &pb));
        let mut pc = pa;
        pc.conditional_assign(&pb, Choice::from(0));
        assert!(niels_eq(&pc, &pa));
        pc.conditional_assign(&pb, Choice::from(1));
        assert!(niels_eq(&pc, &pb));
    }

    #[test]
    fn conditional_negate_affine_niels() {
        let q = multiple(2).as_affine_niels();
        let mut n = q;
        n.conditional_negate(Choice::from(0));
        assert_eq!(n, q);

        n.conditional_negate(Choice::from(1));
        assert_eq!(n.y_plus_x, q.y_minus_x);
        assert_eq!(n.y_minus_x, q.y_plus_x);
        assert_eq!(n.xy2d, -&q.xy2d);
        // P + (-Q) == P - Q
        let P = multiple(5);
        assert_affine(&(&P + &n).as_extended(), 3);

        n.conditional_negate(Choice::from(1));
        assert_eq!(n, q);
    }

    #[test]
    fn conditional_negate_projective_niels() {
        let q = rescale(&multiple(1), 19).as_projective_niels();
        let mut n = q;
        n.conditional_negate(Choice::from(0));
        assert!(niels_eq(&n, &q));

        n.conditional_negate(Choice::from(1));
        assert!(niels_eq(&n, &(-&q)));
        let P = multiple(4);
        assert_affine(&(&P + &n).as_extended(), 3);

        n.conditional_negate(Choice::from(1));
        assert!(niels_eq(&n, &q));
    }

    #[test]
    fn constant_time_table_lookup() {
        // Scan every entry so the access pattern is independent of the index.
        let table: Vec<AffineNielsPoint> = (1..=5).map(|k| multiple(k).as_affine_niels()).collect();
        for secret_index in 0..table.len() {
            let mut selected = AffineNielsPoint::identity();
            for (j, entry) in table.iter().enumerate() {
                let hit = (j as u8).ct_eq(&(secret_index as u8));
                selected.conditional_assign(entry, hit);
            }
            assert_eq!(selected, table[secret_index]);
        }
    }
}
