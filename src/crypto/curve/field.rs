//! Field arithmetic modulo \\(p = 2\^{255} - 19\\).
//!
//! Machine-level operations (carry, multiplication, squaring, selection)
//! are delegated to the formally-verified `curve25519_64` code from
//! fiat-crypto.  Operations defined in terms of other field operations,
//! such as inversion, are defined here.

use core::array::TryFromSliceError;
use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use fiat_crypto::curve25519_64::*;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// An element of the field \\( \mathbb Z / (2\^{255} - 19)\\), held in
/// fiat-crypto's "tight" radix-\\(2\^{51}\\) representation.
///
/// The representation is not canonical; comparisons go through
/// [`FieldElement::to_bytes`].
#[derive(Copy, Clone)]
pub struct FieldElement(pub(crate) fiat_25519_tight_field_element);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.to_bytes()))
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        (self.0).0.zeroize();
    }
}

impl Eq for FieldElement {}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl ConstantTimeEq for FieldElement {
    /// Both sides are normalized to wire format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_selectznz(
            &mut output.0,
            choice.unwrap_u8() as fiat_25519_u1,
            &(a.0).0,
            &(b.0).0,
        );
        FieldElement(output)
    }

    fn conditional_swap(a: &mut FieldElement, b: &mut FieldElement, choice: Choice) {
        let c = choice.unwrap_u8() as fiat_25519_u1;
        let mut new_a = fiat_25519_tight_field_element([0u64; 5]);
        let mut new_b = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_selectznz(&mut new_a.0, c, &(a.0).0, &(b.0).0);
        fiat_25519_selectznz(&mut new_b.0, c, &(b.0).0, &(a.0).0);
        a.0 = new_a;
        b.0 = new_b;
    }

    fn conditional_assign(&mut self, other: &FieldElement, choice: Choice) {
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_selectznz(
            &mut output.0,
            choice.unwrap_u8() as fiat_25519_u1,
            &(self.0).0,
            &(other.0).0,
        );
        self.0 = output;
    }
}

impl<'b> Add<&'b FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut loose = fiat_25519_loose_field_element([0u64; 5]);
        fiat_25519_add(&mut loose, &self.0, &rhs.0);
        FieldElement::carry(&loose)
    }
}

impl<'b> Sub<&'b FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        let mut loose = fiat_25519_loose_field_element([0u64; 5]);
        fiat_25519_sub(&mut loose, &self.0, &rhs.0);
        FieldElement::carry(&loose)
    }
}

impl<'b> Mul<&'b FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_carry_mul(&mut output, &self.relax(), &rhs.relax());
        FieldElement(output)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        let mut loose = fiat_25519_loose_field_element([0u64; 5]);
        fiat_25519_opp(&mut loose, &self.0);
        FieldElement::carry(&loose)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        -&self
    }
}

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(fiat_25519_tight_field_element([0, 0, 0, 0, 0]));
    pub const ONE: FieldElement = FieldElement(fiat_25519_tight_field_element([1, 0, 0, 0, 0]));
    /// \\(p - 1\\), limb by limb.
    pub const MINUS_ONE: FieldElement = FieldElement(fiat_25519_tight_field_element([
        2251799813685228,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]));

    fn carry(loose: &fiat_25519_loose_field_element) -> FieldElement {
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_carry(&mut output, loose);
        FieldElement(output)
    }

    fn relax(&self) -> fiat_25519_loose_field_element {
        let mut loose = fiat_25519_loose_field_element([0u64; 5]);
        fiat_25519_relax(&mut loose, &self.0);
        loose
    }

    /// Embed a small integer.
    pub fn from_u64(x: u64) -> FieldElement {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&x.to_le_bytes());
        FieldElement::from_bytes(&bytes)
    }

    /// Load a `FieldElement` from the low 255 bits of a 256-bit input.
    ///
    /// # Warning
    ///
    /// This function does not check that the input used the canonical
    /// representative.  It masks the high bit, but it will happily
    /// decode 2^255 - 18 to 1.
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let mut temp = *bytes;
        temp[31] &= 127u8;
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_from_bytes(&mut output, &temp);
        FieldElement(output)
    }

    /// Load a `FieldElement` from a slice, which must be exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TryFromSliceError`] if `bytes` is not 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<FieldElement, TryFromSliceError> {
        let array: &[u8; 32] = bytes.try_into()?;
        Ok(FieldElement::from_bytes(array))
    }

    /// Serialize this `FieldElement` to its canonical 32-byte little-endian
    /// encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        fiat_25519_to_bytes(&mut bytes, &self.0);
        bytes
    }

    pub fn is_zero(&self) -> Choice {
        self.to_bytes().ct_eq(&[0u8; 32])
    }

    /// The "sign" of the element: the low bit of its canonical encoding.
    pub fn is_negative(&self) -> Choice {
        (self.to_bytes()[0] & 1).into()
    }

    pub fn square(&self) -> FieldElement {
        let mut output = fiat_25519_tight_field_element([0u64; 5]);
        fiat_25519_carry_square(&mut output, &self.relax());
        FieldElement(output)
    }

    /// Compute `2*self^2`.
    pub fn square2(&self) -> FieldElement {
        let sq = self.square();
        &sq + &sq
    }

    /// Compute `self^(2^k)` by successive squarings. Requires `k > 0`.
    pub fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut output = self.square();
        for _ in 1..k {
            output = output.square();
        }
        output
    }

    /// Compute (self^(2^250-1), self^11), used as a helper function
    /// within invert().
    #[rustfmt::skip] // keep alignment of explanatory comments
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        // Each temporary t_i is self^e_i; squaring shifts e_i left,
        // multiplying adds exponents.
        //
        // Temporary t_i                      Nonzero bits of e_i
        //
        let t0  = self.square();           // 1         e_0 = 2^1
        let t1  = t0.square().square();    // 3         e_1 = 2^3
        let t2  = self * &t1;              // 3,0       e_2 = 2^3 + 2^0
        let t3  = &t0 * &t2;               // 3,1,0
        let t4  = t3.square();             // 4,2,1
        let t5  = &t2 * &t4;               // 4,3,2,1,0
        let t6  = t5.pow2k(5);             // 9,8,7,6,5
        let t7  = &t6 * &t5;               // 9,8,7,6,5,4,3,2,1,0
        let t8  = t7.pow2k(10);            // 19..10
        let t9  = &t8 * &t7;               // 19..0
        let t10 = t9.pow2k(20);            // 39..20
        let t11 = &t10 * &t9;              // 39..0
        let t12 = t11.pow2k(10);           // 49..10
        let t13 = &t12 * &t7;              // 49..0
        let t14 = t13.pow2k(50);           // 99..50
        let t15 = &t14 * &t13;             // 99..0
        let t16 = t15.pow2k(100);          // 199..100
        let t17 = &t16 * &t15;             // 199..0
        let t18 = t17.pow2k(50);           // 249..50
        let t19 = &t18 * &t13;             // 249..0

        (t19, t3)
    }

    /// Given a nonzero field element, compute its inverse.
    ///
    /// The inverse is computed as self^(p-2), since
    /// x^(p-2)x = x^(p-1) = 1 (mod p).
    ///
    /// This function returns zero on input zero.
    #[rustfmt::skip] // keep alignment of explanatory comments
    #[allow(clippy::let_and_return)]
    pub fn invert(&self) -> FieldElement {
        // The bits of p-2 = 2^255 -19 -2 are 11010111111...11.
        //
        //                                 nonzero bits of exponent
        let (t19, t3) = self.pow22501();   // t19: 249..0 ; t3: 3,1,0
        let t20 = t19.pow2k(5);            // 254..5
        let t21 = &t20 * &t3;              // 254..5,3,1,0

        t21
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtle::ConditionallyNegatable;

    /// An arbitrary canonical element of GF(2^255-19).
    static A_BYTES: [u8; 32] = [
        0x04, 0xfe, 0xdf, 0x98, 0xa7, 0xfa, 0x0a, 0x68, 0x84, 0x92, 0xbd, 0x59, 0x08, 0x07, 0xa7,
        0x03, 0x9e, 0xd1, 0xf6, 0xf2, 0xe1, 0xd9, 0xe2, 0xa4, 0xa4, 0x51, 0x47, 0x36, 0xf3, 0xc3,
        0xa9, 0x17,
    ];

    #[test]
    fn test_invert() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let ainv = a.invert();
        assert_eq!(&a * &ainv, FieldElement::ONE);
        assert_eq!(FieldElement::ZERO.invert(), FieldElement::ZERO);
    }

    #[test]
    fn test_square_and_square2() {
        let a = FieldElement::from_bytes(&A_BYTES);
        assert_eq!(a.square(), &a * &a);
        let asq = a.square();
        assert_eq!(a.square2(), &asq + &asq);
        assert_eq!(a.pow2k(3), a.square().square().square());
    }

    #[test]
    fn test_minus_one_encoding() {
        let mut expected = [0xffu8; 32];
        expected[0] = 0xec;
        expected[31] = 0x7f;
        assert_eq!(FieldElement::MINUS_ONE.to_bytes(), expected);
        assert_eq!(&FieldElement::MINUS_ONE + &FieldElement::ONE, FieldElement::ZERO);
        assert_eq!(-&FieldElement::ONE, FieldElement::MINUS_ONE);
    }

    #[test]
    fn test_from_bytes_masks_high_bit() {
        let mut with_high_bit = A_BYTES;
        with_high_bit[31] |= 0x80;
        assert_eq!(
            FieldElement::from_bytes(&with_high_bit),
            FieldElement::from_bytes(&A_BYTES)
        );
    }

    #[test]
    fn test_non_canonical_input_is_reduced() {
        // 2^255 - 18 = p + 1
        let mut p_plus_one = [0xffu8; 32];
        p_plus_one[0] = 0xee;
        p_plus_one[31] = 0x7f;
        assert_eq!(FieldElement::from_bytes(&p_plus_one), FieldElement::ONE);
        assert_eq!(FieldElement::from_bytes(&p_plus_one).to_bytes()[0], 1);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(FieldElement::from_slice(&A_BYTES[..31]).is_err());
        assert!(FieldElement::from_slice(&[0u8; 33]).is_err());
        assert_eq!(
            FieldElement::from_slice(&A_BYTES).unwrap(),
            FieldElement::from_bytes(&A_BYTES)
        );
    }

    #[test]
    fn test_conditional_ops() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let b = FieldElement::from_u64(7);

        assert_eq!(FieldElement::conditional_select(&a, &b, Choice::from(0)), a);
        assert_eq!(FieldElement::conditional_select(&a, &b, Choice::from(1)), b);

        let (mut x, mut y) = (a, b);
        FieldElement::conditional_swap(&mut x, &mut y, Choice::from(0));
        assert_eq!((x, y), (a, b));
        FieldElement::conditional_swap(&mut x, &mut y, Choice::from(1));
        assert_eq!((x, y), (b, a));

        let mut z = a;
        z.conditional_assign(&b, Choice::from(0));
        assert_eq!(z, a);
        z.conditional_assign(&b, Choice::from(1));
        assert_eq!(z, b);

        let mut n = a;
        n.conditional_negate(Choice::from(1));
        assert_eq!(n, -&a);
        n.conditional_negate(Choice::from(0));
        assert_eq!(n, -&a);
    }

    #[test]
    fn test_is_negative_and_is_zero() {
        assert!(bool::from(FieldElement::ZERO.is_zero()));
        assert!(!bool::from(FieldElement::ONE.is_zero()));
        assert!(bool::from(FieldElement::ONE.is_negative()));
        // -1 = p - 1 is even
        assert!(!bool::from(FieldElement::MINUS_ONE.is_negative()));
    }
}
