//! Curve parameters for the twisted Edwards form of Curve25519,
//! \\( -x\^2 + y\^2 = 1 + dx\^2y\^2 \\).
//!
//! These are computed once, on first use, and are read-only afterwards.

#![allow(non_snake_case)]

use std::sync::LazyLock;

use super::edwards::EdwardsPoint;
use super::field::FieldElement;

/// Edwards `d` value, equal to `-121665/121666 mod p`.
pub static EDWARDS_D: LazyLock<FieldElement> = LazyLock::new(|| {
    let numerator = -&FieldElement::from_u64(121665);
    let denominator = FieldElement::from_u64(121666);
    &numerator * &denominator.invert()
});

/// Edwards `2*d` value, equal to `2*(-121665/121666) mod p`.
pub static EDWARDS_D2: LazyLock<FieldElement> = LazyLock::new(|| &*EDWARDS_D + &*EDWARDS_D);

/// Affine \\(x\\)-coordinate of the Ed25519 basepoint, little-endian.
const ED25519_BASEPOINT_X: [u8; 32] = [
    0x1a, 0xd5, 0x25, 0x8f, 0x60, 0x2d, 0x56, 0xc9, 0xb2, 0xa7, 0x25, 0x95, 0x60, 0xc7, 0x2c, 0x69,
    0x5c, 0xdc, 0xd6, 0xfd, 0x31, 0xe2, 0xa4, 0xc0, 0xfe, 0x53, 0x6e, 0xcd, 0xd3, 0x36, 0x69, 0x21,
];

/// Affine \\(y\\)-coordinate of the Ed25519 basepoint, \\(4/5\\), little-endian.
const ED25519_BASEPOINT_Y: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
];

/// The Ed25519 basepoint, as an `EdwardsPoint`.
pub static ED25519_BASEPOINT_POINT: LazyLock<EdwardsPoint> = LazyLock::new(|| {
    EdwardsPoint::from_affine(
        &FieldElement::from_bytes(&ED25519_BASEPOINT_X),
        &FieldElement::from_bytes(&ED25519_BASEPOINT_Y),
    )
});
