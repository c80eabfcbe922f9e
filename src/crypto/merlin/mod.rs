//! Merlin transcripts over STROBE-128.
//!
//! Wire-compatible with Merlin v1.0: the same ordered appends, challenges
//! and rekeys produce the same bytes as any other Merlin implementation.

pub mod rng;
pub mod strobe;
pub mod transcript;

pub use self::rng::{TranscriptError, TranscriptResult, TranscriptRng, TranscriptRngBuilder};
pub use self::strobe::Strobe128;
pub use self::transcript::Transcript;
