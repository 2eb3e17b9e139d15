use core::marker::PhantomData;

use crate::coproc::{
    Coprocessor, DEVICE_NAME, DriverError, Result,
    context::DeviceContext,
    poll::PollBudget,
    regs::{MINIMAL_REGISTER_SPACE, WORD},
    window::RegisterWindow,
};

// Builder states
pub struct NeedWindow;
pub struct NeedMaxTransfer;
pub struct NeedBuffers;
pub struct NeedPollBudget;
pub struct Ready;

/// Typestate builder for a [`Coprocessor`].
///
/// ```rust,ignore
/// let dev = CoprocessorBuilder::new()
///     .window(window)
///     .max_transfer::<4096>()
///     .buffers(0x1000, 0x2000)
///     .default_poll()
///     .build()?;
/// ```
pub struct CoprocessorBuilder<W, const N: usize, State> {
    window: W,
    buf_in: usize,
    buf_out: usize,
    poll: PollBudget,
    _phantom: PhantomData<State>,
}

// Start the builder
impl CoprocessorBuilder<(), 0, NeedWindow> {
    pub fn new() -> Self {
        CoprocessorBuilder {
            window: (),
            buf_in: 0,
            buf_out: 0,
            poll: PollBudget::DEFAULT,
            _phantom: PhantomData,
        }
    }

    /// Set the mapped register window.
    pub fn window<W: RegisterWindow>(
        self,
        window: W,
    ) -> CoprocessorBuilder<W, 0, NeedMaxTransfer> {
        CoprocessorBuilder {
            window,
            buf_in: self.buf_in,
            buf_out: self.buf_out,
            poll: self.poll,
            _phantom: PhantomData,
        }
    }
}

impl Default for CoprocessorBuilder<(), 0, NeedWindow> {
    fn default() -> Self {
        Self::new()
    }
}

// Set transfer capacity
impl<W: RegisterWindow> CoprocessorBuilder<W, 0, NeedMaxTransfer> {
    /// Set the largest single transfer in bytes. Must be a whole number of words.
    pub fn max_transfer<const N: usize>(self) -> CoprocessorBuilder<W, N, NeedBuffers> {
        CoprocessorBuilder {
            window: self.window,
            buf_in: self.buf_in,
            buf_out: self.buf_out,
            poll: self.poll,
            _phantom: PhantomData,
        }
    }
}

// Set buffer offsets
impl<W: RegisterWindow, const N: usize> CoprocessorBuilder<W, N, NeedBuffers> {
    /// Set the input and output buffer offsets inside the window.
    pub fn buffers(
        self,
        buf_in_offset: usize,
        buf_out_offset: usize,
    ) -> CoprocessorBuilder<W, N, NeedPollBudget> {
        CoprocessorBuilder {
            window: self.window,
            buf_in: buf_in_offset,
            buf_out: buf_out_offset,
            poll: self.poll,
            _phantom: PhantomData,
        }
    }
}

// Set poll budget
impl<W: RegisterWindow, const N: usize> CoprocessorBuilder<W, N, NeedPollBudget> {
    pub fn poll_budget(self, poll: PollBudget) -> CoprocessorBuilder<W, N, Ready> {
        CoprocessorBuilder {
            window: self.window,
            buf_in: self.buf_in,
            buf_out: self.buf_out,
            poll,
            _phantom: PhantomData,
        }
    }

    /// Use [`PollBudget::DEFAULT`].
    pub fn default_poll(self) -> CoprocessorBuilder<W, N, Ready> {
        self.poll_budget(PollBudget::DEFAULT)
    }
}

// Build the device
impl<W: RegisterWindow, const N: usize> CoprocessorBuilder<W, N, Ready> {
    /// Validate the layout and bring the device up.
    ///
    /// # Errors
    /// `DeviceNotReady` if the window is smaller than the register space, or if a
    /// buffer is misaligned, overlaps the registers or cannot hold `N` bytes.
    pub fn build(self) -> Result<Coprocessor<W, N>> {
        let size = self.window.size();
        if size < MINIMAL_REGISTER_SPACE {
            log::error!(
                "{DEVICE_NAME}: insufficient memory space ({size:#x} < {MINIMAL_REGISTER_SPACE:#x})"
            );
            return Err(DriverError::DeviceNotReady);
        }
        check_buffer("input", self.buf_in, N, size)?;
        check_buffer("output", self.buf_out, N, size)?;

        log::info!(
            "{DEVICE_NAME}: window {size:#x} bytes, input buffer {:#x}, output buffer {:#x}, {N} byte transfers",
            self.buf_in,
            self.buf_out
        );
        let ctx = DeviceContext::new(self.window, self.buf_in, self.buf_out, self.poll);
        Ok(Coprocessor::new(ctx))
    }
}

fn check_buffer(name: &str, offset: usize, len: usize, size: usize) -> Result<()> {
    if offset % WORD != 0 {
        log::error!("{DEVICE_NAME}: {name} buffer offset {offset:#x} is not word aligned");
        return Err(DriverError::DeviceNotReady);
    }
    if offset < MINIMAL_REGISTER_SPACE {
        log::error!("{DEVICE_NAME}: {name} buffer offset {offset:#x} overlaps the registers");
        return Err(DriverError::DeviceNotReady);
    }
    if offset.checked_add(len).is_none_or(|end| end > size) {
        log::error!(
            "{DEVICE_NAME}: {name} buffer of {len:#x} bytes at {offset:#x} exceeds window of {size:#x}"
        );
        return Err(DriverError::DeviceNotReady);
    }
    Ok(())
}
