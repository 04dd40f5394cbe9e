//! The byte-stream contract a host application's transport must satisfy:
//! one SU per read, one SU per write, non-blocking. A plain synchronous
//! trait, since this engine drives its own single-threaded loop rather
//! than an async reactor.

use std::os::unix::io::RawFd;

use ss7_core::MTP_MAX_SIZE;

/// A link's physical or framed-logical byte channel.
///
/// Implementations are expected to preserve SU boundaries: one call to
/// `read_su` yields at most one SU's worth of bytes (or `None` if no
/// complete SU is currently available), and one call to `write_su` writes
/// exactly one SU.
pub trait Transport {
    type Error;

    /// Attempt to read one complete SU without blocking. `Ok(None)` means
    /// no data is currently available — never an error, matching the
    /// source's `read()` returning 0 on no data.
    fn read_su(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Write one complete SU. Partial writes are a transport-level
    /// concern; the trait's contract is "this whole SU, framed, or none
    /// of it."
    fn write_su(&mut self, su: &[u8]) -> Result<(), Self::Error>;

    /// Whether this transport needs a write-ready poll even with no SU
    /// currently queued (false for most transports; true only for ones
    /// that batch/flush asynchronously). Defaults to false.
    fn wants_write_poll(&self) -> bool {
        false
    }
}

/// A DAHDI-style fd where the kernel driver delivers exactly one SU per
/// `read(2)` — the concrete [`Transport`] a non-offloaded [`crate::Mtp2Link`]
/// is driven through.
pub struct FdTransport(pub RawFd);

impl Transport for FdTransport {
    type Error = std::io::Error;

    fn read_su(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut buf = [0u8; MTP_MAX_SIZE];
        let n = unsafe { libc::read(self.0, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if n < 0 {
            return Err(std::io::Error::last_os_error());
        }
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf[..n as usize].to_vec()))
    }

    fn write_su(&mut self, su: &[u8]) -> Result<(), Self::Error> {
        let n = unsafe { libc::write(self.0, su.as_ptr() as *const libc::c_void, su.len()) };
        if n < 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(())
    }
}
