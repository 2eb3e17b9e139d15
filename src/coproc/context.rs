use crate::coproc::{poll::PollBudget, window::RegisterWindow};

/// Everything the protocol needs to address one device.
///
/// Built once by [`CoprocessorBuilder`](crate::coproc::CoprocessorBuilder) after the
/// window and buffer offsets have been validated, then never modified.
#[derive(Debug)]
pub struct DeviceContext<W: RegisterWindow> {
    window: W,
    buf_in_offset: usize,
    buf_out_offset: usize,
    poll: PollBudget,
}

impl<W: RegisterWindow> DeviceContext<W> {
    pub(crate) fn new(
        window: W,
        buf_in_offset: usize,
        buf_out_offset: usize,
        poll: PollBudget,
    ) -> Self {
        Self {
            window,
            buf_in_offset,
            buf_out_offset,
            poll,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn region_length(&self) -> usize {
        self.window.size()
    }

    /// Offset of the buffer the input FIFO is filled from.
    pub fn buf_in_offset(&self) -> usize {
        self.buf_in_offset
    }

    /// Offset of the buffer the output FIFO is drained into.
    pub fn buf_out_offset(&self) -> usize {
        self.buf_out_offset
    }

    pub fn poll_budget(&self) -> PollBudget {
        self.poll
    }

    pub(crate) fn into_window(self) -> W {
        self.window
    }
}
