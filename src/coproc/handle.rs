use crate::coproc::{
    Coprocessor, Result,
    boundary::{UserSink, UserSource},
    control::{ControlOp, ControlReply},
    window::RegisterWindow,
};

/// An open reference to a [`Coprocessor`], released on drop.
pub struct Handle<'a, W: RegisterWindow, const N: usize> {
    device: &'a Coprocessor<W, N>,
}

impl<'a, W: RegisterWindow, const N: usize> core::fmt::Debug for Handle<'a, W, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handle").finish_non_exhaustive()
    }
}

impl<'a, W: RegisterWindow, const N: usize> Handle<'a, W, N> {
    pub(crate) fn new(device: &'a Coprocessor<W, N>) -> Self {
        Self { device }
    }

    /// Reads whatever the device drains from its output FIFO.
    ///
    /// `sink.capacity()` is the maximum length; a larger drain fails with
    /// `Truncated` and delivers nothing.
    pub fn read<K: UserSink + ?Sized>(&self, sink: &mut K) -> Result<usize> {
        self.device.read(sink)
    }

    pub fn write<S: UserSource + ?Sized>(&self, payload: &S) -> Result<usize> {
        self.device.write(payload)
    }

    pub fn control(&self, op: ControlOp) -> Result<ControlReply> {
        self.device.control(op)
    }

    pub fn close(self) {}
}

impl<'a, W: RegisterWindow, const N: usize> Drop for Handle<'a, W, N> {
    fn drop(&mut self) {
        self.device.release();
    }
}
