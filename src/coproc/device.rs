use core::cell::Cell;

use crate::coproc::{
    DEVICE_NAME, DriverError, Result,
    boundary::{UserSink, UserSource},
    context::DeviceContext,
    control::{ControlOp, ControlReply},
    gateway::UserRegisterGateway,
    handle::Handle,
    transfer::TransferEngine,
    window::RegisterWindow,
};

/// One bound coprocessor.
///
/// Transfers are serialized by a per-device lock that is held for the whole
/// trigger, poll and readback sequence. The lock also guards the staging buffer.
pub struct Coprocessor<W: RegisterWindow, const N: usize> {
    ctx: DeviceContext<W>,
    engine: spin::Mutex<TransferEngine<N>>,
    open_handles: critical_section::Mutex<Cell<usize>>,
}

impl<W: RegisterWindow, const N: usize> core::fmt::Debug for Coprocessor<W, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coprocessor")
            .field("region_length", &self.ctx.region_length())
            .field("buf_in_offset", &self.ctx.buf_in_offset())
            .field("buf_out_offset", &self.ctx.buf_out_offset())
            .field("max_transfer", &N)
            .finish_non_exhaustive()
    }
}

impl<W: RegisterWindow, const N: usize> Coprocessor<W, N> {
    pub(crate) fn new(ctx: DeviceContext<W>) -> Self {
        Self {
            ctx,
            engine: spin::Mutex::new(TransferEngine::new()),
            open_handles: critical_section::Mutex::new(Cell::new(0)),
        }
    }

    pub fn context(&self) -> &DeviceContext<W> {
        &self.ctx
    }

    /// Acquires a handle. The device stays bound while any handle is alive.
    pub fn open(&self) -> Handle<'_, W, N> {
        critical_section::with(|cs| {
            let count = self.open_handles.borrow(cs);
            count.set(count.get() + 1);
        });
        Handle::new(self)
    }

    pub(crate) fn release(&self) {
        critical_section::with(|cs| {
            let count = self.open_handles.borrow(cs);
            count.set(count.get().saturating_sub(1));
        });
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        critical_section::with(|cs| self.open_handles.borrow(cs).get())
    }

    /// Runs `f` with exclusive use of the transfer registers and staging buffer.
    pub(crate) fn with_engine<R>(
        &self,
        f: impl FnOnce(&mut TransferEngine<N>, &DeviceContext<W>) -> R,
    ) -> R {
        let mut engine = self.engine.lock();
        f(&mut engine, &self.ctx)
    }

    /// Pushes `payload` into the input FIFO; returns the bytes the device accepted.
    pub fn write<S: UserSource + ?Sized>(&self, payload: &S) -> Result<usize> {
        self.with_engine(|engine, ctx| engine.write_to_device(ctx, payload))
    }

    /// Drains the output FIFO into `sink`; returns the bytes delivered.
    pub fn read<K: UserSink + ?Sized>(&self, sink: &mut K) -> Result<usize> {
        self.with_engine(|engine, ctx| engine.read_from_device(ctx, sink))
    }

    pub fn registers(&self) -> UserRegisterGateway<'_, W> {
        UserRegisterGateway::new(&self.ctx)
    }

    pub fn control(&self, op: ControlOp) -> Result<ControlReply> {
        let regs = self.registers();
        let reply = match op {
            ControlOp::SetUserReg { index, value } => {
                regs.set_user_register(index, value)?;
                ControlReply::Done
            }
            ControlOp::GetUserReg { index } => ControlReply::Value(regs.get_user_register(index)?),
            ControlOp::GetFifoInEmpty => ControlReply::Flag(regs.fifo_in_empty()),
            ControlOp::GetFifoInFull => ControlReply::Flag(regs.fifo_in_full()),
            ControlOp::GetFifoInCopying => ControlReply::Flag(regs.fifo_in_copying()),
            ControlOp::GetFifoInCopiedAmount => ControlReply::Value(regs.fifo_in_copied_amount()),
            ControlOp::GetFifoOutEmpty => ControlReply::Flag(regs.fifo_out_empty()),
            ControlOp::GetFifoOutFull => ControlReply::Flag(regs.fifo_out_full()),
            ControlOp::GetFifoOutCopying => ControlReply::Flag(regs.fifo_out_copying()),
            ControlOp::GetFifoOutCopiedAmount => {
                ControlReply::Value(regs.fifo_out_copied_amount())
            }
            ControlOp::Unrecognized(code) => {
                log::warn!("{DEVICE_NAME}: unrecognized control operation {code:#x}");
                return Err(DriverError::InvalidArgument);
            }
        };
        Ok(reply)
    }

    /// Unbinds the device and returns the window to the platform layer for unmapping.
    pub fn detach(self) -> W {
        log::info!("{DEVICE_NAME}: detached");
        self.ctx.into_window()
    }
}
