//! Test support utilities - only compiled in test builds.

use core::cell::RefCell;
use std::{collections::VecDeque, vec, vec::Vec};

use crate::coproc::{
    Coprocessor, CoprocessorBuilder,
    boundary::{CopyFault, UserSink, UserSource},
    context::DeviceContext,
    poll::PollBudget,
    regs::{self, Control, Status},
    transfer::TransferEngine,
    window::RegisterWindow,
};

/// Simulated window: 1 KiB, input buffer at 0x100, output buffer at 0x200.
pub const SIM_WINDOW: usize = 0x400;
pub const SIM_BUF_IN: usize = 0x100;
pub const SIM_BUF_OUT: usize = 0x200;

/// Standard test configuration: 64-byte transfers.
pub type TestEngine = TransferEngine<64>;
pub type TestDevice = Coprocessor<SimulatedCoprocessor, 64>;

/// One register access observed by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u32),
}

struct SimState {
    memory: Vec<u8>,
    control: u32,
    data_amount: u32,
    fifo: VecDeque<u32>,
    fifo_capacity: usize,
    max_out_words: usize,
    latency: u32,
    in_busy: u32,
    out_busy: u32,
    in_copied: u32,
    out_copied: u32,
    forced_status: Option<u32>,
    status_reads: usize,
    input_triggers: usize,
    output_triggers: usize,
    overlaps: usize,
    trace: Option<Vec<Access>>,
}

/// Echo coprocessor: words pushed into the input FIFO come back out of the
/// output FIFO.
///
/// Each copy keeps its copying flag raised for `latency` status reads. Any
/// control, data-amount or buffer write that lands while a copy is in flight is
/// counted in [`overlaps`](Self::overlaps).
pub struct SimulatedCoprocessor {
    state: critical_section::Mutex<RefCell<SimState>>,
}

impl SimulatedCoprocessor {
    pub fn new() -> Self {
        Self {
            state: critical_section::Mutex::new(RefCell::new(SimState {
                memory: vec![0; SIM_WINDOW],
                control: 0,
                data_amount: 0,
                fifo: VecDeque::new(),
                fifo_capacity: 256,
                max_out_words: 16,
                latency: 1,
                in_busy: 0,
                out_busy: 0,
                in_copied: 0,
                out_copied: 0,
                forced_status: None,
                status_reads: 0,
                input_triggers: 0,
                output_triggers: 0,
                overlaps: 0,
                trace: None,
            })),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs)))
    }

    /// Status reads each copy keeps its copying flag raised for.
    pub fn with_latency(self, polls: u32) -> Self {
        self.with_state(|s| s.latency = polls);
        self
    }

    /// Input FIFO depth in words.
    pub fn with_fifo_capacity(self, words: usize) -> Self {
        self.with_state(|s| s.fifo_capacity = words);
        self
    }

    /// Most words a single output copy moves.
    pub fn with_max_out_words(self, words: usize) -> Self {
        self.with_state(|s| s.max_out_words = words);
        self
    }

    /// Makes every status read return exactly `status`.
    pub fn force_status(&self, status: Status) {
        self.force_status_raw(status.bits());
    }

    pub fn force_status_raw(&self, raw: u32) {
        self.with_state(|s| s.forced_status = Some(raw));
    }

    pub fn release_status(&self) {
        self.with_state(|s| s.forced_status = None);
    }

    /// Overwrites the transfer status counters.
    pub fn set_copied(&self, input_words: u32, output_words: u32) {
        self.with_state(|s| {
            s.in_copied = input_words;
            s.out_copied = output_words;
        });
    }

    pub fn start_trace(&self) {
        self.with_state(|s| s.trace = Some(Vec::new()));
    }

    pub fn trace(&self) -> Vec<Access> {
        self.with_state(|s| s.trace.clone().unwrap_or_default())
    }

    pub fn status_reads(&self) -> usize {
        self.with_state(|s| s.status_reads)
    }

    pub fn input_triggers(&self) -> usize {
        self.with_state(|s| s.input_triggers)
    }

    pub fn output_triggers(&self) -> usize {
        self.with_state(|s| s.output_triggers)
    }

    pub fn overlaps(&self) -> usize {
        self.with_state(|s| s.overlaps)
    }

    /// Words still queued in the FIFO.
    pub fn queued_words(&self) -> usize {
        self.with_state(|s| s.fifo.len())
    }

    pub fn fill(&self, offset: usize, len: usize, value: u8) {
        self.with_state(|s| s.memory[offset..offset + len].fill(value));
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Vec<u8> {
        self.with_state(|s| s.memory[offset..offset + len].to_vec())
    }
}

impl Default for SimulatedCoprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimState {
    fn busy(&self) -> bool {
        self.in_busy > 0 || self.out_busy > 0
    }

    fn word(&self, offset: usize) -> u32 {
        let mut w = [0u8; 4];
        w.copy_from_slice(&self.memory[offset..offset + 4]);
        u32::from_ne_bytes(w)
    }

    fn set_word(&mut self, offset: usize, value: u32) {
        self.memory[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }

    fn status(&mut self) -> u32 {
        self.status_reads += 1;
        if let Some(raw) = self.forced_status {
            return raw;
        }

        let mut status = Status::empty();
        status.set(Status::FIFO_IN_EMPTY, self.fifo.is_empty());
        status.set(Status::FIFO_IN_FULL, self.fifo.len() >= self.fifo_capacity);
        status.set(Status::FIFO_IN_COPYING, self.in_busy > 0);
        status.set(Status::FIFO_OUT_EMPTY, self.fifo.is_empty());
        status.set(Status::FIFO_OUT_FULL, self.fifo.len() >= self.fifo_capacity);
        status.set(Status::FIFO_OUT_COPYING, self.out_busy > 0);

        self.in_busy = self.in_busy.saturating_sub(1);
        self.out_busy = self.out_busy.saturating_sub(1);
        status.bits()
    }

    fn push_input(&mut self) {
        self.input_triggers += 1;
        let requested = (self.data_amount & regs::data_amount::IN_DATA_AMOUNT_MASK) as usize;
        let room = self.fifo_capacity.saturating_sub(self.fifo.len());
        let n = requested.min(room);
        for i in 0..n {
            let w = self.word(SIM_BUF_IN + i * regs::WORD);
            self.fifo.push_back(w);
        }
        self.in_copied = n as u32;
        self.in_busy = self.latency;
    }

    fn drain_output(&mut self) {
        self.output_triggers += 1;
        let n = self.fifo.len().min(self.max_out_words);
        for i in 0..n {
            let w = self.fifo.pop_front().unwrap_or_default();
            self.set_word(SIM_BUF_OUT + i * regs::WORD, w);
        }
        self.out_copied = n as u32;
        self.out_busy = self.latency;
    }

    fn write_control(&mut self, value: u32) {
        let rising = Control::from_bits_retain(value & !self.control);
        self.control = value;
        if rising.contains(Control::COPY_TO_FIFO) {
            self.push_input();
        }
        if rising.contains(Control::COPY_FROM_FIFO) {
            self.drain_output();
        }
    }
}

fn in_buffers(offset: usize) -> bool {
    offset >= SIM_BUF_IN
}

impl RegisterWindow for SimulatedCoprocessor {
    fn size(&self) -> usize {
        SIM_WINDOW
    }

    fn read32(&self, offset: usize) -> u32 {
        self.with_state(|s| {
            if let Some(trace) = s.trace.as_mut() {
                trace.push(Access::Read(offset));
            }
            match offset {
                regs::CONTROL => s.control,
                regs::STATUS => s.status(),
                regs::FIFO_IN_DATA_AMOUNT => s.data_amount,
                regs::FIFO_TRANSFER_STATUS => {
                    (s.in_copied << regs::transfer_status::INPUT_DATA_COPIED_SHIFT)
                        | (s.out_copied << regs::transfer_status::OUTPUT_DATA_COPIED_SHIFT)
                }
                _ => s.word(offset),
            }
        })
    }

    fn write32(&self, offset: usize, value: u32) {
        self.with_state(|s| {
            if let Some(trace) = s.trace.as_mut() {
                trace.push(Access::Write(offset, value));
            }
            let protocol_write = matches!(offset, regs::CONTROL | regs::FIFO_IN_DATA_AMOUNT)
                || in_buffers(offset);
            if protocol_write && s.busy() {
                s.overlaps += 1;
            }
            match offset {
                regs::CONTROL => s.write_control(value),
                regs::FIFO_IN_DATA_AMOUNT => s.data_amount = value,
                regs::STATUS | regs::FIFO_TRANSFER_STATUS => {}
                _ => s.set_word(offset, value),
            }
        })
    }
}

/// Helper to build a context over a simulator with the default poll budget.
pub fn test_context(sim: &SimulatedCoprocessor) -> DeviceContext<&SimulatedCoprocessor> {
    test_context_polling(sim, PollBudget::DEFAULT)
}

pub fn test_context_polling(
    sim: &SimulatedCoprocessor,
    poll: PollBudget,
) -> DeviceContext<&SimulatedCoprocessor> {
    DeviceContext::new(sim, SIM_BUF_IN, SIM_BUF_OUT, poll)
}

/// Helper to create a device over the given simulator.
pub fn test_device(sim: SimulatedCoprocessor) -> TestDevice {
    CoprocessorBuilder::new()
        .window(sim)
        .max_transfer::<64>()
        .buffers(SIM_BUF_IN, SIM_BUF_OUT)
        .default_poll()
        .build()
        .unwrap()
}

/// A source whose boundary copy always fails.
pub struct FaultingSource(pub usize);

impl UserSource for FaultingSource {
    fn len(&self) -> usize {
        self.0
    }

    fn copy_to(&self, _dst: &mut [u8]) -> Result<(), CopyFault> {
        Err(CopyFault)
    }
}

/// A sink whose boundary copy always fails.
pub struct FaultingSink(pub usize);

impl UserSink for FaultingSink {
    fn capacity(&self) -> usize {
        self.0
    }

    fn copy_from(&mut self, _src: &[u8]) -> Result<(), CopyFault> {
        Err(CopyFault)
    }
}

/// Asserts that the result is an AccessDenied error.
pub fn assert_denied<T: core::fmt::Debug>(result: crate::coproc::Result<T>) {
    assert_eq!(result.unwrap_err(), crate::coproc::DriverError::AccessDenied);
}
