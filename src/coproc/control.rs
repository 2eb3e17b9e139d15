//! Control operations accepted by [`Handle::control`](crate::coproc::Handle::control).

/// Numeric command codes used by the character device interface.
pub mod codes {
    pub const SET_USER_REGISTER: u32 = 0;
    pub const GET_USER_REGISTER: u32 = 1;
    pub const GET_FIFO_IN_EMPTY: u32 = 2;
    pub const GET_FIFO_IN_FULL: u32 = 3;
    pub const GET_FIFO_IN_COPY_STATUS: u32 = 4;
    pub const GET_FIFO_IN_COPIED_DATA_AMOUNT: u32 = 5;
    pub const GET_FIFO_OUT_EMPTY: u32 = 6;
    pub const GET_FIFO_OUT_FULL: u32 = 7;
    pub const GET_FIFO_OUT_COPY_STATUS: u32 = 8;
    pub const GET_FIFO_OUT_COPIED_DATA_AMOUNT: u32 = 9;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOp {
    SetUserReg { index: i32, value: u32 },
    GetUserReg { index: i32 },
    GetFifoInEmpty,
    GetFifoInFull,
    GetFifoInCopying,
    GetFifoInCopiedAmount,
    GetFifoOutEmpty,
    GetFifoOutFull,
    GetFifoOutCopying,
    GetFifoOutCopiedAmount,
    /// Any code not listed in [`codes`]; rejected with `InvalidArgument`.
    Unrecognized(u32),
}

impl ControlOp {
    /// Decodes a raw command. `index` and `value` are only read by the
    /// user register commands.
    pub const fn from_raw(code: u32, index: i32, value: u32) -> Self {
        match code {
            codes::SET_USER_REGISTER => ControlOp::SetUserReg { index, value },
            codes::GET_USER_REGISTER => ControlOp::GetUserReg { index },
            codes::GET_FIFO_IN_EMPTY => ControlOp::GetFifoInEmpty,
            codes::GET_FIFO_IN_FULL => ControlOp::GetFifoInFull,
            codes::GET_FIFO_IN_COPY_STATUS => ControlOp::GetFifoInCopying,
            codes::GET_FIFO_IN_COPIED_DATA_AMOUNT => ControlOp::GetFifoInCopiedAmount,
            codes::GET_FIFO_OUT_EMPTY => ControlOp::GetFifoOutEmpty,
            codes::GET_FIFO_OUT_FULL => ControlOp::GetFifoOutFull,
            codes::GET_FIFO_OUT_COPY_STATUS => ControlOp::GetFifoOutCopying,
            codes::GET_FIFO_OUT_COPIED_DATA_AMOUNT => ControlOp::GetFifoOutCopiedAmount,
            other => ControlOp::Unrecognized(other),
        }
    }
}

/// Result of a successful control operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlReply {
    Done,
    Value(u32),
    Flag(bool),
}

impl ControlReply {
    /// The reply as the single word a character device hands back.
    pub const fn as_word(self) -> u32 {
        match self {
            ControlReply::Done => 0,
            ControlReply::Value(v) => v,
            ControlReply::Flag(f) => f as u32,
        }
    }
}
