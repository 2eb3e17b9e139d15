//! FIFO copy protocol.
//!
//! Both directions follow the same shape: produce a rising edge on a control bit,
//! busy-wait for the matching copying flag to drop, then read how many words the
//! device actually moved from the transfer status register. Each sequence must run
//! without any other control, buffer or data-amount access to the same device in
//! between; [`Coprocessor`](crate::coproc::Coprocessor) holds its transfer lock for
//! the whole call.

use heapless::Vec;

use crate::coproc::{
    DEVICE_NAME, DriverError, Result,
    boundary::{UserSink, UserSource},
    context::DeviceContext,
    poll,
    regs::{self, Control, Status, TransferStatus},
    window::RegisterWindow,
};

/// Drives transfers for one device, reusing a staging buffer of `N` bytes.
///
/// `N` bounds the largest single write and the largest single read.
pub struct TransferEngine<const N: usize> {
    staging: Vec<u8, N>,
}

impl<const N: usize> TransferEngine<N> {
    const VALID_CAPACITY: () = {
        assert!(N % regs::WORD == 0, "transfer capacity must be whole words");
        assert!(
            N / regs::WORD <= regs::data_amount::IN_DATA_AMOUNT_MASK as usize,
            "transfer capacity exceeds the data amount field"
        );
    };

    pub const fn new() -> Self {
        let () = Self::VALID_CAPACITY;
        Self {
            staging: Vec::new(),
        }
    }

    /// Pushes `payload` into the input FIFO and returns the bytes the device accepted.
    pub(crate) fn write_to_device<W, S>(
        &mut self,
        ctx: &DeviceContext<W>,
        payload: &S,
    ) -> Result<usize>
    where
        W: RegisterWindow,
        S: UserSource + ?Sized,
    {
        self.stage(payload)?;
        self.start_input(ctx);
        self.finish_input(ctx)
    }

    /// Drains the output FIFO into `sink` and returns the number of bytes delivered.
    pub(crate) fn read_from_device<W, K>(
        &mut self,
        ctx: &DeviceContext<W>,
        sink: &mut K,
    ) -> Result<usize>
    where
        W: RegisterWindow,
        K: UserSink + ?Sized,
    {
        self.start_output(ctx);
        self.finish_output(ctx, sink)
    }

    /// Copies the payload into the staging buffer, zero padded to whole words.
    pub(crate) fn stage<S: UserSource + ?Sized>(&mut self, payload: &S) -> Result<()> {
        let len = payload.len();
        let padded = regs::padded_len(len);

        self.staging.clear();
        self.staging.resize(padded, 0).map_err(|_| {
            log::warn!("{DEVICE_NAME}: payload of {len} bytes exceeds staging capacity of {N}");
            DriverError::ResourceExhausted
        })?;

        if payload.copy_to(&mut self.staging[..len]).is_err() {
            self.staging.clear();
            return Err(DriverError::BoundaryFault);
        }
        Ok(())
    }

    /// Writes the staged words to the input buffer and starts the copy into the FIFO.
    pub(crate) fn start_input<W: RegisterWindow>(&self, ctx: &DeviceContext<W>) {
        let window = ctx.window();
        let words = (self.staging.len() / regs::WORD) as u32;

        window.copy_into_window(ctx.buf_in_offset(), &self.staging);
        window.write32(
            regs::FIFO_IN_DATA_AMOUNT,
            words & regs::data_amount::IN_DATA_AMOUNT_MASK,
        );
        trigger(window, Control::COPY_TO_FIFO);
        log::debug!("{DEVICE_NAME}: input copy of {words} words started");
    }

    pub(crate) fn finish_input<W: RegisterWindow>(&self, ctx: &DeviceContext<W>) -> Result<usize> {
        let window = ctx.window();
        poll::wait_idle(window, Status::FIFO_IN_COPYING, ctx.poll_budget())?;

        let copied = TransferStatus(window.read32(regs::FIFO_TRANSFER_STATUS)).input_bytes();
        log::debug!(
            "{DEVICE_NAME}: input copy done, {copied} of {} bytes accepted",
            self.staging.len()
        );
        Ok(copied)
    }

    pub(crate) fn start_output<W: RegisterWindow>(&self, ctx: &DeviceContext<W>) {
        trigger(ctx.window(), Control::COPY_FROM_FIFO);
        log::debug!("{DEVICE_NAME}: output copy started");
    }

    pub(crate) fn finish_output<W, K>(&mut self, ctx: &DeviceContext<W>, sink: &mut K) -> Result<usize>
    where
        W: RegisterWindow,
        K: UserSink + ?Sized,
    {
        let window = ctx.window();
        poll::wait_idle(window, Status::FIFO_OUT_COPYING, ctx.poll_budget())?;

        let available = TransferStatus(window.read32(regs::FIFO_TRANSFER_STATUS)).output_bytes();
        log::debug!("{DEVICE_NAME}: output copy done, {available} bytes available");

        // The FIFO has already been drained, so anything too large is lost.
        let capacity = N.min(sink.capacity());
        if available > capacity {
            log::warn!(
                "{DEVICE_NAME}: read of {available} bytes into {capacity} byte buffer refused"
            );
            return Err(DriverError::Truncated {
                available,
                capacity,
            });
        }

        self.staging.clear();
        self.staging
            .resize(available, 0)
            .map_err(|_| DriverError::Truncated {
                available,
                capacity,
            })?;
        window.copy_from_window(ctx.buf_out_offset(), &mut self.staging);

        sink.copy_from(&self.staging)
            .map_err(|_| DriverError::BoundaryFault)?;
        Ok(available)
    }
}

impl<const N: usize> Default for TransferEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces a 0 -> 1 edge on `bit`, leaving every other control bit as it was.
pub(crate) fn trigger<W: RegisterWindow>(window: &W, bit: Control) {
    let mut control = Control::from_bits_retain(window.read32(regs::CONTROL));
    control.remove(bit);
    window.write32(regs::CONTROL, control.bits());
    control.insert(bit);
    window.write32(regs::CONTROL, control.bits());
}
