//! Register map of the coprocessor interface.
//!
//! ```text
//! 0x00  CONTROL               W   edge-triggered copy requests
//! 0x04  STATUS                R   FIFO empty/full/copying flags
//! 0x08  FIFO_IN_DATA_AMOUNT   W   words to push into the input FIFO
//! 0x0C  FIFO_TRANSFER_STATUS  R   words copied in (15:0) and out (31:16)
//! 0x10  USER_REG_0..5         RW  general purpose
//! ```
//!
//! The input and output buffer windows live in the same mapped region at offsets
//! supplied by the platform.

/// Width of a protocol word in bytes.
pub const WORD: usize = 4;

pub const CONTROL: usize = 0x00;
pub const STATUS: usize = 0x04;
pub const FIFO_IN_DATA_AMOUNT: usize = 0x08;
pub const FIFO_TRANSFER_STATUS: usize = 0x0C;
pub const USER_REG_0: usize = 0x10;

/// Number of user registers.
pub const USER_REG_COUNT: usize = 6;

/// Smallest register window able to hold every register above.
pub const MINIMAL_REGISTER_SPACE: usize = USER_REG_0 + USER_REG_COUNT * WORD;

/// Offset of user register `index`, if it exists.
#[inline]
pub const fn user_reg(index: usize) -> Option<usize> {
    if index < USER_REG_COUNT {
        Some(USER_REG_0 + index * WORD)
    } else {
        None
    }
}

/// Generates `<NAME>_SHIFT`, `<NAME>_MASK` and a `<name>(raw)` extractor per field.
macro_rules! register_fields {
    ($( $(#[$meta:meta])* $name:ident : $shift:literal, $width:literal; )*) => {
        paste::paste! {
            $(
                $(#[$meta])*
                pub const [<$name _SHIFT>]: u32 = $shift;

                #[doc = "In-place mask of `" $name "`."]
                pub const [<$name _MASK>]: u32 = (((1u64 << $width) - 1) as u32) << $shift;

                #[doc = "Extracts `" $name "` from a raw register value."]
                #[inline]
                pub const fn [<$name:lower>](raw: u32) -> u32 {
                    (raw & [<$name _MASK>]) >> [<$name _SHIFT>]
                }
            )*
        }
    };
}

pub mod control {
    register_fields! {
        /// Pushes the input buffer into the input FIFO on a rising edge.
        COPY_TO_FIFO: 0, 1;
        /// Drains the output FIFO into the output buffer on a rising edge.
        COPY_FROM_FIFO: 1, 1;
    }
}

pub mod status {
    register_fields! {
        FIFO_IN_EMPTY: 0, 1;
        FIFO_IN_FULL: 1, 1;
        FIFO_IN_COPYING: 2, 1;
        FIFO_OUT_EMPTY: 3, 1;
        FIFO_OUT_FULL: 4, 1;
        FIFO_OUT_COPYING: 5, 1;
    }
}

pub mod data_amount {
    register_fields! {
        /// Word count of the next input transfer.
        IN_DATA_AMOUNT: 0, 16;
    }
}

pub mod transfer_status {
    register_fields! {
        /// Words moved from the input buffer into the input FIFO.
        INPUT_DATA_COPIED: 0, 16;
        /// Words moved from the output FIFO into the output buffer.
        OUTPUT_DATA_COPIED: 16, 16;
    }
}

bitflags::bitflags! {
    /// Control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        const COPY_TO_FIFO = control::COPY_TO_FIFO_MASK;
        const COPY_FROM_FIFO = control::COPY_FROM_FIFO_MASK;
    }
}

bitflags::bitflags! {
    /// Status register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        const FIFO_IN_EMPTY = status::FIFO_IN_EMPTY_MASK;
        const FIFO_IN_FULL = status::FIFO_IN_FULL_MASK;
        const FIFO_IN_COPYING = status::FIFO_IN_COPYING_MASK;
        const FIFO_OUT_EMPTY = status::FIFO_OUT_EMPTY_MASK;
        const FIFO_OUT_FULL = status::FIFO_OUT_FULL_MASK;
        const FIFO_OUT_COPYING = status::FIFO_OUT_COPYING_MASK;
    }
}

/// Decoded FIFO transfer status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStatus(pub u32);

impl TransferStatus {
    #[inline]
    pub const fn input_words(self) -> u32 {
        transfer_status::input_data_copied(self.0)
    }

    #[inline]
    pub const fn output_words(self) -> u32 {
        transfer_status::output_data_copied(self.0)
    }

    #[inline]
    pub const fn input_bytes(self) -> usize {
        self.input_words() as usize * WORD
    }

    #[inline]
    pub const fn output_bytes(self) -> usize {
        self.output_words() as usize * WORD
    }
}

/// Rounds a byte count up to a whole number of words.
#[inline]
pub const fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}
