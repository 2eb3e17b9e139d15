pub mod boundary;
pub mod builder;
pub mod context;
pub mod control;
pub mod device;
pub mod error;
pub mod gateway;
pub mod handle;
pub mod mmio;
pub mod poll;
pub mod probe;
pub mod regs;
pub mod transfer;
pub mod window;

#[cfg(test)]
mod test_support;

/// Prefix of every log line emitted by the driver.
pub const DEVICE_NAME: &str = "axi_coprocessor_interface";

pub use boundary::{CopyFault, UserSink, UserSource};
pub use builder::CoprocessorBuilder;
pub use context::DeviceContext;
pub use control::{ControlOp, ControlReply};
pub use device::Coprocessor;
pub use error::{DriverError, Result};
pub use gateway::UserRegisterGateway;
pub use handle::Handle;
pub use mmio::MmioWindow;
pub use poll::PollBudget;
pub use probe::{COMPATIBLE, PlatformProperties, probe};
pub use regs::{Control, Status, TransferStatus};
pub use transfer::TransferEngine;
pub use window::RegisterWindow;

pub mod prelude {
    pub use super::{
        Control, ControlOp, ControlReply, Coprocessor, CoprocessorBuilder, DriverError, Handle,
        MmioWindow, PlatformProperties, PollBudget, RegisterWindow, Status, TransferStatus,
        UserRegisterGateway, UserSink, UserSource,
    };
}
