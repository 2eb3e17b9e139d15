use crate::coproc::regs::WORD;

/// Raw access to the mapped register window.
///
/// Implementations must perform every call as a real access to the device, in
/// program order: no caching, no merging, no reordering relative to other calls.
/// The copy protocol relies on the edge produced by two consecutive control writes.
///
/// Offsets are byte offsets from the start of the window. Buffer copies always
/// move whole words and start at word-aligned offsets.
pub trait RegisterWindow {
    /// Length of the window in bytes.
    fn size(&self) -> usize;

    /// Loads the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Stores `value` to the 32-bit register at `offset`.
    fn write32(&self, offset: usize, value: u32);

    /// Copies `out.len()` bytes starting at `offset` out of the window.
    fn copy_from_window(&self, offset: usize, out: &mut [u8]) {
        debug_assert!(out.len() % WORD == 0);
        for (i, chunk) in out.chunks_exact_mut(WORD).enumerate() {
            chunk.copy_from_slice(&self.read32(offset + i * WORD).to_ne_bytes());
        }
    }

    /// Copies `data` into the window starting at `offset`.
    fn copy_into_window(&self, offset: usize, data: &[u8]) {
        debug_assert!(data.len() % WORD == 0);
        for (i, chunk) in data.chunks_exact(WORD).enumerate() {
            let mut word = [0u8; WORD];
            word.copy_from_slice(chunk);
            self.write32(offset + i * WORD, u32::from_ne_bytes(word));
        }
    }
}

impl<W: RegisterWindow + ?Sized> RegisterWindow for &W {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }

    fn copy_from_window(&self, offset: usize, out: &mut [u8]) {
        (**self).copy_from_window(offset, out)
    }

    fn copy_into_window(&self, offset: usize, data: &[u8]) {
        (**self).copy_into_window(offset, data)
    }
}
