//! Point representations and the group law for the twisted Edwards form
//! of Curve25519.
//!
//! The prime-field engine underneath is fiat-crypto's verified
//! `curve25519_64` code; constant-time selection comes from `subtle`.

#[macro_use]
pub(crate) mod macros;

pub mod constants;
pub mod curve_models;
pub mod edwards;
pub mod field;
pub mod traits;

pub use self::curve_models::{AffineNielsPoint, CompletedPoint, ProjectiveNielsPoint, ProjectivePoint};
pub use self::edwards::EdwardsPoint;
pub use self::field::FieldElement;
pub use self::traits::{Identity, ValidityCheck};
