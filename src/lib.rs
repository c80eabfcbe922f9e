//! Ed25519 point representations with their group law, and Merlin
//! transcripts for Fiat-Shamir challenges and proof nonces.
//!
//! - [`crypto::curve`]: extended, projective, completed and Niels point
//!   models with inversion-free addition and doubling plus constant-time
//!   selection and negation.
//! - [`crypto::merlin`]: STROBE-128 based transcripts and the
//!   witness-and-entropy keyed transcript RNG.
//! - [`crypto::entropy`]: the operating-system entropy byte stream.

pub mod cli;
pub mod crypto;
pub mod runner;
