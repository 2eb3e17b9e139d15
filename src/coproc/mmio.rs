#![allow(unsafe_code)]

use core::ptr::NonNull;

use crate::coproc::{regs::WORD, window::RegisterWindow};

/// Register window backed by a memory-mapped region.
///
/// The window does not own the mapping. Whoever mapped it gets it back from
/// [`Coprocessor::detach`](crate::coproc::Coprocessor::detach) and unmaps it.
pub struct MmioWindow {
    base: NonNull<u8>,
    len: usize,
}

impl core::fmt::Debug for MmioWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MmioWindow")
            .field("base", &format_args!("{:p}", self.base))
            .field("len", &self.len)
            .finish()
    }
}

// SAFETY: the window is a plain address range. Every access is a single volatile
// load or store; exclusive use of the transfer registers is enforced by the
// per-device transfer lock, not by this type.
unsafe impl Send for MmioWindow {}
unsafe impl Sync for MmioWindow {}

impl MmioWindow {
    /// # Safety
    /// `base` must point to a device mapping of at least `len` bytes that stays
    /// mapped for the lifetime of the returned window, mapped with device
    /// (uncached) attributes, and aligned to a word boundary.
    pub unsafe fn new(base: NonNull<u8>, len: usize) -> Self {
        debug_assert!(base.as_ptr() as usize % WORD == 0);
        Self { base, len }
    }

    /// Base address of the mapping.
    pub fn base(&self) -> NonNull<u8> {
        self.base
    }

    #[inline]
    fn reg(&self, offset: usize) -> *mut u32 {
        assert!(
            offset % WORD == 0 && offset + WORD <= self.len,
            "register offset {offset:#x} outside window of {:#x} bytes",
            self.len
        );
        // SAFETY: offset + 4 <= len, and base is valid for len bytes.
        unsafe { self.base.as_ptr().add(offset).cast::<u32>() }
    }
}

impl RegisterWindow for MmioWindow {
    fn size(&self) -> usize {
        self.len
    }

    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: reg() checked bounds and alignment; the device may change the
        // value at any time, so the load must not be elided.
        unsafe { self.reg(offset).read_volatile() }
    }

    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: reg() checked bounds and alignment; the store has side effects
        // on the device.
        unsafe { self.reg(offset).write_volatile(value) }
    }
}
