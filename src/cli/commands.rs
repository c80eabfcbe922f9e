use std::io;

use zeroize::Zeroizing;

use crate::cli::args::{TranscriptOp, Witness};
use crate::crypto::merlin::{Transcript, TranscriptResult};

/// A challenge extracted while running the command-line transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub label: String,
    pub bytes: Vec<u8>,
}

/// Apply `ops` in order to a fresh transcript for `label`, collecting every
/// extracted challenge.
pub fn run_transcript(label: &str, ops: &[TranscriptOp]) -> (Transcript, Vec<Challenge>) {
    let mut transcript = Transcript::new(label.as_bytes());
    let mut challenges = Vec::new();

    for op in ops {
        match op {
            TranscriptOp::Append { label, message } => {
                transcript.append_message(label.as_bytes(), message);
            }
            TranscriptOp::AppendU64 { label, value } => {
                transcript.append_u64(label.as_bytes(), *value);
            }
            TranscriptOp::Extract { label, len } => {
                let mut bytes = vec![0u8; *len];
                transcript.challenge_bytes(label.as_bytes(), &mut bytes);
                challenges.push(Challenge {
                    label: label.clone(),
                    bytes,
                });
            }
        }
    }

    (transcript, challenges)
}

/// Derive `len` nonce bytes bound to the transcript, the witnesses and
/// 32 bytes read from `entropy`.
pub fn derive_nonce<R: io::Read + ?Sized>(
    transcript: &Transcript,
    witnesses: &[Witness],
    len: usize,
    entropy: &mut R,
) -> TranscriptResult<Zeroizing<Vec<u8>>> {
    let builder = witnesses.iter().fold(transcript.build_rng(), |builder, witness| {
        builder.rekey_with_witness_bytes(witness.label.as_bytes(), &witness.bytes)
    });

    let mut rng = builder.finalize(entropy)?;
    let mut nonce = Zeroizing::new(vec![0u8; len]);
    rng.fill_bytes(&mut nonce);

    Ok(nonce)
}
