//! Echo example: driving a coprocessor end to end
//!
//! This example demonstrates:
//! - Implementing `RegisterWindow` for a device model
//! - Bringing a device up from platform properties with `probe`
//! - Writing to the input FIFO and reading the output FIFO through a handle
//! - Using control operations for user registers and FIFO status

use std::{cell::RefCell, collections::VecDeque};

use axi_coproc::{
    coproc::{
        probe,
        probe::{INPUT_BUFFER_OFFSET_PROP, OUTPUT_BUFFER_OFFSET_PROP},
        regs,
    },
    prelude::*,
};

// ============ Window Layout ============
const WINDOW_SIZE: usize = 0x400;
const BUF_IN: usize = 0x100;
const BUF_OUT: usize = 0x200;

/// Largest transfer in bytes.
const MAX_TRANSFER: usize = 64;

/// A coprocessor model that XORs every word with user register 0.
///
/// Copies complete immediately, so the copying flags never stay raised.
struct XorCoprocessor {
    state: RefCell<Model>,
}

struct Model {
    memory: Vec<u8>,
    control: u32,
    data_amount: u32,
    fifo: VecDeque<u32>,
    in_copied: u32,
    out_copied: u32,
}

impl XorCoprocessor {
    fn new() -> Self {
        Self {
            state: RefCell::new(Model {
                memory: vec![0; WINDOW_SIZE],
                control: 0,
                data_amount: 0,
                fifo: VecDeque::new(),
                in_copied: 0,
                out_copied: 0,
            }),
        }
    }
}

impl Model {
    fn word(&self, offset: usize) -> u32 {
        let mut w = [0u8; 4];
        w.copy_from_slice(&self.memory[offset..offset + 4]);
        u32::from_ne_bytes(w)
    }

    fn set_word(&mut self, offset: usize, value: u32) {
        self.memory[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }

    fn write_control(&mut self, value: u32) {
        let rising = Control::from_bits_retain(value & !self.control);
        self.control = value;

        if rising.contains(Control::COPY_TO_FIFO) {
            let key = self.word(regs::USER_REG_0);
            let words = (self.data_amount & regs::data_amount::IN_DATA_AMOUNT_MASK) as usize;
            for i in 0..words {
                let w = self.word(BUF_IN + i * regs::WORD);
                self.fifo.push_back(w ^ key);
            }
            self.in_copied = words as u32;
        }
        if rising.contains(Control::COPY_FROM_FIFO) {
            let words = self.fifo.len().min(MAX_TRANSFER / regs::WORD);
            for i in 0..words {
                let w = self.fifo.pop_front().unwrap_or_default();
                self.set_word(BUF_OUT + i * regs::WORD, w);
            }
            self.out_copied = words as u32;
        }
    }

    fn status(&self) -> Status {
        let mut status = Status::empty();
        status.set(Status::FIFO_IN_EMPTY, self.fifo.is_empty());
        status.set(Status::FIFO_OUT_EMPTY, self.fifo.is_empty());
        status
    }
}

impl RegisterWindow for XorCoprocessor {
    fn size(&self) -> usize {
        WINDOW_SIZE
    }

    fn read32(&self, offset: usize) -> u32 {
        let m = self.state.borrow();
        match offset {
            regs::CONTROL => m.control,
            regs::STATUS => m.status().bits(),
            regs::FIFO_IN_DATA_AMOUNT => m.data_amount,
            regs::FIFO_TRANSFER_STATUS => {
                (m.in_copied << regs::transfer_status::INPUT_DATA_COPIED_SHIFT)
                    | (m.out_copied << regs::transfer_status::OUTPUT_DATA_COPIED_SHIFT)
            }
            _ => m.word(offset),
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        let mut m = self.state.borrow_mut();
        match offset {
            regs::CONTROL => m.write_control(value),
            regs::FIFO_IN_DATA_AMOUNT => m.data_amount = value,
            regs::STATUS | regs::FIFO_TRANSFER_STATUS => {}
            _ => m.set_word(offset, value),
        }
    }
}

pub fn main() -> Result<(), DriverError> {
    // Properties as the platform would hand them over from the device tree
    let props = [
        (INPUT_BUFFER_OFFSET_PROP, BUF_IN as u32),
        (OUTPUT_BUFFER_OFFSET_PROP, BUF_OUT as u32),
    ];

    let dev = probe::<_, MAX_TRANSFER>(XorCoprocessor::new(), &props, PollBudget::polls(1000))?;
    let handle = dev.open();
    println!("bound {dev:?}, {} handle(s) open", dev.open_handles());

    // ========== Control ==========
    handle.control(ControlOp::SetUserReg {
        index: 0,
        value: 0x2020_2020,
    })?;
    let key = handle.control(ControlOp::GetUserReg { index: 0 })?;
    println!("user register 0 = {:#010x}", key.as_word());

    // Index 6 is outside the user register range
    match handle.control(ControlOp::GetUserReg { index: 6 }) {
        Err(e) => println!("user register 6: {e} (errno {})", e.errno()),
        Ok(reply) => println!("user register 6 unexpectedly returned {reply:?}"),
    }

    // ========== Transfer ==========
    // Seven bytes are padded to two words before they reach the FIFO;
    // the padding comes back as spaces after the XOR
    let accepted = handle.write(b"abcdefg")?;
    println!("device accepted {accepted} bytes");
    println!(
        "input FIFO empty: {:?}, copied words: {:?}",
        handle.control(ControlOp::GetFifoInEmpty)?,
        handle.control(ControlOp::GetFifoInCopiedAmount)?
    );

    let mut reply: heapless::Vec<u8, MAX_TRANSFER> = heapless::Vec::new();
    let n = handle.read(&mut reply)?;
    println!("read {n} bytes: {:?}", String::from_utf8_lossy(&reply));

    // A sink smaller than what the device copied is rejected
    handle.write(&[0u8; 16][..])?;
    let mut small = [0u8; 8];
    if let Err(e) = handle.read(&mut small[..]) {
        println!("short read: {e}");
    }

    handle.close();
    let window = dev.detach();
    println!("detached, window of {:#x} bytes returned", window.size());
    Ok(())
}
