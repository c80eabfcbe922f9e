//! Operating-system entropy as a byte stream.
//!
//! [`OsEntropy`] implements [`std::io::Read`] so it can be handed straight
//! to `TranscriptRngBuilder::finalize`.  On Unix it reads `/dev/urandom`,
//! falling back to `/dev/random`; on Windows it calls `RtlGenRandom`.

use std::io;

/// Error types for entropy collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyError {
    /// No entropy device could be opened on this platform
    Unavailable,
    /// The device was opened but reading from it failed
    ReadFailed,
}

impl std::fmt::Display for EntropyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntropyError::Unavailable => write!(f, "no system entropy source available"),
            EntropyError::ReadFailed => write!(f, "failed to read system entropy"),
        }
    }
}

impl std::error::Error for EntropyError {}

impl From<EntropyError> for io::Error {
    fn from(err: EntropyError) -> Self {
        let kind = match err {
            EntropyError::Unavailable => io::ErrorKind::NotFound,
            EntropyError::ReadFailed => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// System entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl OsEntropy {
    pub fn new() -> Self {
        OsEntropy
    }

    /// Fill `dest` completely from the operating system.
    pub fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        if dest.is_empty() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            fill_unix(dest)?;
        }

        #[cfg(windows)]
        {
            fill_windows(dest)?;
        }

        #[cfg(not(any(unix, windows)))]
        {
            return Err(EntropyError::Unavailable);
        }

        Ok(())
    }
}

impl io::Read for OsEntropy {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill(buf)?;
        Ok(buf.len())
    }
}

#[cfg(unix)]
fn fill_unix(dest: &mut [u8]) -> Result<(), EntropyError> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open("/dev/urandom")
        .or_else(|_| File::open("/dev/random"))
        .map_err(|_| EntropyError::Unavailable)?;
    file.read_exact(dest).map_err(|_| EntropyError::ReadFailed)
}

#[cfg(windows)]
fn fill_windows(dest: &mut [u8]) -> Result<(), EntropyError> {
    // RtlGenRandom is exported from advapi32.dll as SystemFunction036
    #[link(name = "advapi32")]
    unsafe extern "system" {
        fn SystemFunction036(buffer: *mut u8, length: u32) -> u8;
    }

    for chunk in dest.chunks_mut(u32::MAX as usize) {
        let ok = unsafe { SystemFunction036(chunk.as_mut_ptr(), chunk.len() as u32) };
        if ok == 0 {
            return Err(EntropyError::ReadFailed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_fill_produces_varying_output() {
        let mut source = OsEntropy::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn test_read_fills_whole_buffer() {
        let mut buf = vec![0u8; 1000];
        let n = OsEntropy.read(&mut buf).unwrap();
        assert_eq!(n, 1000);
        assert!(buf.iter().filter(|&&x| x == 0).count() < 100);
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(OsEntropy.read(&mut []).unwrap(), 0);
    }

    #[test]
    fn test_error_conversion() {
        let err: io::Error = EntropyError::Unavailable.into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("no system entropy"));

        let err: io::Error = EntropyError::ReadFailed.into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_finalizes_transcript_rng() {
        use crate::crypto::merlin::Transcript;

        let mut rng = Transcript::new(b"entropy test")
            .build_rng()
            .rekey_with_witness_bytes(b"w", b"secret")
            .finalize(&mut OsEntropy::new())
            .unwrap();
        assert_ne!(rng.gen_array::<32>(), [0u8; 32]);
    }
}
