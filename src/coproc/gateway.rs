use crate::coproc::{
    DEVICE_NAME, DriverError, Result,
    context::DeviceContext,
    regs::{self, Status, TransferStatus},
    window::RegisterWindow,
};

/// Validated access to the user registers and decoded FIFO status.
///
/// Nothing here touches the control register, the data-amount register or the
/// transfer buffers, so it may run while a transfer is in flight.
pub struct UserRegisterGateway<'a, W: RegisterWindow> {
    ctx: &'a DeviceContext<W>,
}

/// Generates one status flag query per listed field.
macro_rules! status_flag_queries {
    ($($flag:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Reads the status register and decodes `" $flag "`."]
                #[inline]
                pub fn [<$flag:lower>](&self) -> bool {
                    regs::status::[<$flag:lower>](self.raw_status()) != 0
                }
            )*
        }
    };
}

impl<'a, W: RegisterWindow> UserRegisterGateway<'a, W> {
    pub(crate) fn new(ctx: &'a DeviceContext<W>) -> Self {
        Self { ctx }
    }

    /// Reads user register `index` (0..=5).
    ///
    /// Returns `AccessDenied` for any other index without touching the device.
    pub fn get_user_register(&self, index: i32) -> Result<u32> {
        let offset = user_offset(index)?;
        Ok(self.ctx.window().read32(offset))
    }

    /// Writes user register `index` (0..=5).
    ///
    /// Returns `AccessDenied` for any other index without touching the device.
    pub fn set_user_register(&self, index: i32, value: u32) -> Result<()> {
        let offset = user_offset(index)?;
        self.ctx.window().write32(offset, value);
        Ok(())
    }

    pub fn status(&self) -> Status {
        Status::from_bits_retain(self.raw_status())
    }

    pub fn transfer_status(&self) -> TransferStatus {
        TransferStatus(self.ctx.window().read32(regs::FIFO_TRANSFER_STATUS))
    }

    status_flag_queries!(
        FIFO_IN_EMPTY,
        FIFO_IN_FULL,
        FIFO_IN_COPYING,
        FIFO_OUT_EMPTY,
        FIFO_OUT_FULL,
        FIFO_OUT_COPYING,
    );

    /// Words the last input copy moved into the FIFO.
    pub fn fifo_in_copied_amount(&self) -> u32 {
        self.transfer_status().input_words()
    }

    /// Words the last output copy moved into the output buffer.
    pub fn fifo_out_copied_amount(&self) -> u32 {
        self.transfer_status().output_words()
    }

    fn raw_status(&self) -> u32 {
        self.ctx.window().read32(regs::STATUS)
    }
}

fn user_offset(index: i32) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .and_then(regs::user_reg)
        .ok_or_else(|| {
            log::warn!("{DEVICE_NAME}: user register index {index} out of range");
            DriverError::AccessDenied
        })
}
