//! Merlin transcripts for Fiat-Shamir challenges.
//!
//! A transcript absorbs labelled protocol messages in order and squeezes
//! challenge bytes bound to everything absorbed before them.  Provers and
//! verifiers that replay the same ordered calls get the same challenges.

use zeroize::Zeroize;

use super::rng::TranscriptRngBuilder;
use super::strobe::Strobe128;

const MERLIN_PROTOCOL_LABEL: &[u8] = b"Merlin v1.0";
const DOMAIN_SEPARATOR_LABEL: &[u8] = b"dom-sep";

/// Encode a length as the 32-bit little-endian metadata Merlin absorbs.
///
/// Lengths above `u32::MAX` are not representable on the wire and are a
/// caller bug.
pub(crate) fn encode_usize_as_u32(x: usize) -> [u8; 4] {
    assert!(x <= (u32::MAX as usize), "message length exceeds u32::MAX");
    (x as u32).to_le_bytes()
}

/// A domain-separated Fiat-Shamir transcript.
///
/// `Clone` forks the transcript: both copies continue from the same
/// history and evolve independently afterwards.
#[derive(Clone, Zeroize)]
pub struct Transcript {
    strobe: Strobe128,
}

impl core::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Transcript").finish_non_exhaustive()
    }
}

impl Transcript {
    /// Start a transcript for the application protocol named by `label`.
    ///
    /// ```
    /// use edmerlin::crypto::merlin::Transcript;
    ///
    /// let mut transcript = Transcript::new(b"test protocol");
    /// transcript.append_message(b"some label", b"some data");
    ///
    /// let mut challenge = [0u8; 32];
    /// transcript.challenge_bytes(b"challenge", &mut challenge);
    /// assert_eq!(
    ///     hex::encode(challenge),
    ///     "d5a21972d0d5fe320c0d263fac7fffb8145aa640af6e9bca177c03c7efcf0615"
    /// );
    /// ```
    pub fn new(label: &[u8]) -> Transcript {
        let mut transcript = Transcript {
            strobe: Strobe128::new(MERLIN_PROTOCOL_LABEL),
        };
        transcript.append_message(DOMAIN_SEPARATOR_LABEL, label);

        transcript
    }

    /// Append a prover's `message` under `label`.
    pub fn append_message(&mut self, label: &[u8], message: &[u8]) {
        let data_len = encode_usize_as_u32(message.len());
        self.strobe.meta_ad(label, false);
        self.strobe.meta_ad(&data_len, true);
        self.strobe.ad(message, false);
    }

    /// Append `x` as 8 little-endian bytes.
    pub fn append_u64(&mut self, label: &[u8], x: u64) {
        self.append_message(label, &x.to_le_bytes());
    }

    /// Fill `dest` with challenge bytes bound to the transcript so far.
    ///
    /// The label and the requested length are absorbed first, so asking for
    /// a different number of bytes yields an unrelated challenge.
    pub fn challenge_bytes(&mut self, label: &[u8], dest: &mut [u8]) {
        let data_len = encode_usize_as_u32(dest.len());
        self.strobe.meta_ad(label, false);
        self.strobe.meta_ad(&data_len, true);
        self.strobe.prf(dest, false);
    }

    /// Alias of [`Transcript::challenge_bytes`].
    pub fn extract_bytes(&mut self, label: &[u8], dest: &mut [u8]) {
        self.challenge_bytes(label, dest);
    }

    /// Fork the sponge into an RNG builder.
    ///
    /// The transcript itself is left untouched; the builder works on a copy.
    pub fn build_rng(&self) -> TranscriptRngBuilder {
        TranscriptRngBuilder::from_strobe(self.strobe.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(transcript: &mut Transcript, label: &[u8], len: usize) -> String {
        let mut out = vec![0u8; len];
        transcript.challenge_bytes(label, &mut out);
        hex::encode(out)
    }

    #[test]
    fn test_equivalence_simple() {
        let mut transcript = Transcript::new(b"test protocol");
        transcript.append_message(b"some label", b"some data");

        assert_eq!(
            challenge(&mut transcript, b"challenge", 32),
            "d5a21972d0d5fe320c0d263fac7fffb8145aa640af6e9bca177c03c7efcf0615"
        );
    }

    #[test]
    fn test_short_labels() {
        let mut transcript = Transcript::new(b"test");
        transcript.append_message(b"dom", b"msg");

        assert_eq!(
            challenge(&mut transcript, b"chal", 32),
            "d89be8350daa819c54e0c511f2a92c18910ba8c3bc440da3f98ee9c7b27d3c84"
        );
    }

    #[test]
    fn test_append_u64() {
        let mut transcript = Transcript::new(b"test");
        transcript.append_u64(b"n", 42);

        assert_eq!(
            challenge(&mut transcript, b"chal", 16),
            "e63ea3d65c5ed8e5d9a7d44d91371b38"
        );

        let mut as_message = Transcript::new(b"test");
        as_message.append_message(b"n", &42u64.to_le_bytes());
        assert_eq!(
            challenge(&mut as_message, b"chal", 16),
            "e63ea3d65c5ed8e5d9a7d44d91371b38"
        );
    }

    #[test]
    fn test_extract_bytes_matches_challenge_bytes() {
        let mut a = Transcript::new(b"test");
        let mut b = Transcript::new(b"test");
        a.append_message(b"dom", b"msg");
        b.append_message(b"dom", b"msg");

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.challenge_bytes(b"chal", &mut out_a);
        b.extract_bytes(b"chal", &mut out_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            let mut t = Transcript::new(b"app");
            t.append_message(b"a", b"1");
            t.append_message(b"b", b"2");
            challenge(&mut t, b"c", 32)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_order_and_labels_matter() {
        let mut base = Transcript::new(b"app");
        base.append_message(b"a", b"1");
        base.append_message(b"b", b"2");
        let base = challenge(&mut base, b"c", 32);

        let mut swapped = Transcript::new(b"app");
        swapped.append_message(b"b", b"2");
        swapped.append_message(b"a", b"1");
        assert_ne!(base, challenge(&mut swapped, b"c", 32));

        let mut relabelled = Transcript::new(b"app");
        relabelled.append_message(b"a", b"1");
        relabelled.append_message(b"x", b"2");
        assert_ne!(base, challenge(&mut relabelled, b"c", 32));

        let mut other_app = Transcript::new(b"other app");
        other_app.append_message(b"a", b"1");
        other_app.append_message(b"b", b"2");
        assert_ne!(base, challenge(&mut other_app, b"c", 32));
    }

    #[test]
    fn test_message_boundaries_are_bound() {
        // Moving bytes between the label and the message must not collide.
        let mut t1 = Transcript::new(b"app");
        t1.append_message(b"ab", b"c");
        let mut t2 = Transcript::new(b"app");
        t2.append_message(b"a", b"bc");
        assert_ne!(challenge(&mut t1, b"c", 32), challenge(&mut t2, b"c", 32));
    }

    #[test]
    fn test_length_domain_separation() {
        let mut t16 = Transcript::new(b"app");
        let mut t32 = Transcript::new(b"app");
        let short = challenge(&mut t16, b"c", 16);
        let long = challenge(&mut t32, b"c", 32);
        assert_ne!(short, long[..32]);
    }

    #[test]
    fn test_successive_challenges_differ() {
        let mut t = Transcript::new(b"app");
        let first = challenge(&mut t, b"c", 32);
        let second = challenge(&mut t, b"c", 32);
        assert_ne!(first, second);
    }

    #[test]
    fn test_clone_forks_independently() {
        let mut original = Transcript::new(b"app");
        original.append_message(b"shared", b"history");
        let mut fork = original.clone();

        fork.append_message(b"fork only", b"data");
        let fork_challenge = challenge(&mut fork, b"c", 32);

        let mut fresh = Transcript::new(b"app");
        fresh.append_message(b"shared", b"history");
        assert_eq!(challenge(&mut original, b"c", 32), challenge(&mut fresh, b"c", 32));
        assert_ne!(fork_challenge, challenge(&mut original.clone(), b"c", 32));
    }

    #[test]
    fn test_long_message() {
        let message = vec![0x99u8; 1024];
        let mut a = Transcript::new(b"app");
        a.append_message(b"big", &message);
        let mut b = Transcript::new(b"app");
        b.append_message(b"big", &message[..1023]);
        assert_ne!(challenge(&mut a, b"c", 64), challenge(&mut b, b"c", 64));
    }
}
