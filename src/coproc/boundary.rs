//! Copies across the trust boundary.
//!
//! The host integration layer implements these over its user-copy primitives.
//! Plain slices and `heapless::Vec` implement them for in-kernel callers and tests.

use heapless::Vec;

/// Marker error for a failed boundary copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFault;

/// Caller-owned bytes to be written to the device.
pub trait UserSource {
    /// Number of bytes offered.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies exactly `dst.len()` bytes from the start of the source.
    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault>;
}

/// Caller-owned buffer receiving bytes read from the device.
pub trait UserSink {
    /// Maximum number of bytes accepted.
    fn capacity(&self) -> usize;

    /// Copies all of `src` into the sink. Never called with more than `capacity()` bytes.
    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault>;
}

impl UserSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault> {
        let src = self.get(..dst.len()).ok_or(CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserSource for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault> {
        self.as_slice().copy_to(dst)
    }
}

impl<S: UserSource + ?Sized> UserSource for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault> {
        (**self).copy_to(dst)
    }
}

impl UserSink for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        let dst = self.get_mut(..src.len()).ok_or(CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserSink for [u8; N] {
    fn capacity(&self) -> usize {
        N
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        self.as_mut_slice().copy_from(src)
    }
}

impl<const N: usize> UserSink for Vec<u8, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        self.clear();
        self.extend_from_slice(src).map_err(|_| CopyFault)
    }
}

impl<S: UserSink + ?Sized> UserSink for &mut S {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        (**self).copy_from(src)
    }
}
