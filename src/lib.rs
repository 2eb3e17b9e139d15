//! A `no_std`, no-alloc driver core for an AXI coprocessor with FIFO buffers.
//!
//! The coprocessor exposes a small register window: a control register whose
//! bits request copies on a rising edge, a status register, a data-amount
//! register, a transfer status register, six user registers and two buffer
//! windows. This crate implements the copy protocol on top of any
//! [`RegisterWindow`](coproc::RegisterWindow) and leaves mapping, interrupt
//! handling and the character device glue to the host.
//!
//! # Features
//!
//! - **Zero heap allocation** - staging buffer is a fixed-size `heapless::Vec`
//! - **Serialized transfers** - one lock per device covers trigger, poll and readback
//! - **Bounded polling** - a stuck device yields `Timeout` instead of hanging
//! - **Typed register map** - bitflags and generated field extractors
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌────────────────────┐      ┌──────────────────┐
//! │  Handle          │      │  Coprocessor       │      │  RegisterWindow  │
//! │                  │      │                    │      │                  │
//! │  write(source)   │─────▶│  TransferEngine    │─────▶│  buffer in       │
//! │  read(sink)      │◀─────│  (transfer lock)   │◀─────│  buffer out      │
//! │                  │      │                    │      │  control/status  │
//! │  control(op)     │─────▶│  UserRegister-     │─────▶│  user registers  │
//! │                  │      │  Gateway           │      │                  │
//! └──────────────────┘      └────────────────────┘      └──────────────────┘
//! ```
//!
//! - **Writes** stage the payload, pad it to whole words, copy it into the input
//!   buffer and push it into the input FIFO
//! - **Reads** drain the output FIFO into the output buffer and copy back exactly
//!   what the device reports
//! - **Control** operations read or write user registers and decode FIFO status
//!   without taking the transfer lock
//!
//! # Example
//!
//! ```rust,ignore
//! use axi_coproc::prelude::*;
//!
//! // SAFETY: `base` maps the device's register window for `len` bytes.
//! let window = unsafe { MmioWindow::new(base, len) };
//!
//! let dev = CoprocessorBuilder::new()
//!     .window(window)
//!     .max_transfer::<4096>()
//!     .buffers(0x1000, 0x2000)
//!     .default_poll()
//!     .build()?;
//!
//! let handle = dev.open();
//! handle.write(&[1u8, 2, 3, 4][..])?;
//!
//! let mut reply = [0u8; 4096];
//! let n = handle.read(&mut reply[..])?;
//!
//! handle.control(ControlOp::SetUserReg { index: 0, value: 0x1 })?;
//! ```

#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

pub mod coproc;

pub mod prelude {
    pub use crate::coproc::prelude::*;
}
