//! Transcript-bound RNG for proof nonces.
//!
//! A [`TranscriptRngBuilder`] starts from a copy of the transcript state,
//! is rekeyed with the prover's secret witnesses and is then finalized
//! with 32 bytes of external entropy.  The resulting [`TranscriptRng`]
//! depends on the public transcript, the witnesses and the entropy, so a
//! broken entropy source alone cannot predict its output.

use std::io;

use zeroize::{Zeroize, Zeroizing};

use super::strobe::Strobe128;
use super::transcript::encode_usize_as_u32;

/// Error types for transcript RNG construction
#[derive(Debug)]
pub enum TranscriptError {
    /// The entropy source failed or ran out before 32 bytes were read
    EntropyRead {
        operation: &'static str,
        source: io::Error,
    },
}

impl std::fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptError::EntropyRead { operation, source } => {
                write!(f, "{operation}: failed to read entropy: {source}")
            }
        }
    }
}

impl std::error::Error for TranscriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptError::EntropyRead { source, .. } => Some(source),
        }
    }
}

pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Builder for a [`TranscriptRng`].
///
/// Every method takes the builder by value.  Once `finalize` has run,
/// successfully or not, the builder is gone:
///
/// ```compile_fail
/// use edmerlin::crypto::merlin::Transcript;
///
/// let builder = Transcript::new(b"app").build_rng();
/// let _rng = builder.finalize(&mut &[0u8; 32][..]);
/// let _again = builder.finalize(&mut &[0u8; 32][..]);
/// ```
///
/// ```compile_fail
/// use edmerlin::crypto::merlin::Transcript;
///
/// let builder = Transcript::new(b"app").build_rng();
/// let _rng = builder.finalize(&mut &[0u8; 32][..]);
/// let _rekeyed = builder.rekey_with_witness_bytes(b"w", b"secret");
/// ```
#[derive(Zeroize)]
pub struct TranscriptRngBuilder {
    strobe: Strobe128,
}

impl std::fmt::Debug for TranscriptRngBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptRngBuilder").finish_non_exhaustive()
    }
}

impl TranscriptRngBuilder {
    pub(crate) fn from_strobe(strobe: Strobe128) -> Self {
        Self { strobe }
    }

    /// Fold secret `witness` bytes into the RNG state under `label`.
    pub fn rekey_with_witness_bytes(mut self, label: &[u8], witness: &[u8]) -> Self {
        let witness_len = encode_usize_as_u32(witness.len());
        self.strobe.meta_ad(label, false);
        self.strobe.meta_ad(&witness_len, true);
        self.strobe.key(witness, false);

        self
    }

    /// Key the state with 32 bytes read from `entropy` and return the RNG.
    ///
    /// Fails only if `entropy` cannot supply 32 bytes.
    ///
    /// ```
    /// use edmerlin::crypto::merlin::Transcript;
    ///
    /// let mut transcript = Transcript::new(b"test");
    /// transcript.append_message(b"dom", b"msg");
    ///
    /// let mut rng = transcript
    ///     .build_rng()
    ///     .rekey_with_witness_bytes(b"w", &[0u8; 32])
    ///     .finalize(&mut &[0x42u8; 32][..])?;
    ///
    /// let nonce: [u8; 32] = rng.gen_array();
    /// assert_ne!(nonce, [0u8; 32]);
    /// # Ok::<(), edmerlin::crypto::merlin::TranscriptError>(())
    /// ```
    pub fn finalize<R: io::Read + ?Sized>(mut self, entropy: &mut R) -> TranscriptResult<TranscriptRng> {
        let mut random_bytes = Zeroizing::new([0u8; 32]);
        entropy
            .read_exact(&mut random_bytes[..])
            .map_err(|source| TranscriptError::EntropyRead {
                operation: "finalize",
                source,
            })?;

        self.strobe.meta_ad(b"rng", false);
        self.strobe.key(&random_bytes[..], false);

        Ok(TranscriptRng {
            strobe: self.strobe,
        })
    }
}

/// Nonce stream produced by [`TranscriptRngBuilder::finalize`].
///
/// Each request absorbs its own length before squeezing, so two requests of
/// different sizes never share output.  The stream cannot be rewound.
#[derive(Zeroize)]
pub struct TranscriptRng {
    strobe: Strobe128,
}

impl std::fmt::Debug for TranscriptRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptRng").finish_non_exhaustive()
    }
}

impl TranscriptRng {
    /// Fill `dest` with nonce bytes.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        let dest_len = encode_usize_as_u32(dest.len());
        self.strobe.meta_ad(&dest_len, false);
        self.strobe.prf(dest, false);
    }

    pub fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.gen_array())
    }

    pub fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.gen_array())
    }

    /// Generate a fixed-size array in a single request.
    pub fn gen_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.fill_bytes(&mut out);
        out
    }
}

impl io::Read for TranscriptRng {
    /// Always fills the whole buffer as one request.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill_bytes(buf);
        Ok(buf.len())
    }
}
