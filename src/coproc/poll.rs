use core::num::NonZeroU32;

use crate::coproc::{
    DEVICE_NAME, DriverError, Result,
    regs::{self, Status},
    window::RegisterWindow,
};

/// Upper bound on status reads while waiting for a copy to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget(Option<NonZeroU32>);

impl PollBudget {
    /// Budget used when the builder is told to use defaults.
    pub const DEFAULT: PollBudget = PollBudget(NonZeroU32::new(1_000_000));

    /// Gives up after `n` status reads. A budget of zero is treated as one.
    pub const fn polls(n: u32) -> Self {
        match NonZeroU32::new(n) {
            Some(n) => PollBudget(Some(n)),
            None => PollBudget(NonZeroU32::new(1)),
        }
    }

    /// Waits for as long as the device takes.
    pub const fn unbounded() -> Self {
        PollBudget(None)
    }

    pub const fn limit(&self) -> Option<u32> {
        match self.0 {
            Some(n) => Some(n.get()),
            None => None,
        }
    }
}

impl Default for PollBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Busy-waits until every bit of `busy` is clear in the status register.
///
/// Returns the number of status reads performed.
pub(crate) fn wait_idle<W: RegisterWindow>(
    window: &W,
    busy: Status,
    budget: PollBudget,
) -> Result<u32> {
    let mut polls: u32 = 0;
    loop {
        let status = Status::from_bits_retain(window.read32(regs::STATUS));
        polls = polls.saturating_add(1);
        if !status.intersects(busy) {
            return Ok(polls);
        }
        if budget.limit().is_some_and(|limit| polls >= limit) {
            log::warn!(
                "{DEVICE_NAME}: still busy ({status:?}) after {polls} status polls"
            );
            return Err(DriverError::Timeout);
        }
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coproc::test_support::SimulatedCoprocessor;

    #[test]
    fn zero_budget_still_polls_once() {
        assert_eq!(PollBudget::polls(0).limit(), Some(1));
        assert_eq!(PollBudget::unbounded().limit(), None);
    }

    #[test]
    fn idle_device_returns_after_one_poll() {
        let sim = SimulatedCoprocessor::new();
        let polls = wait_idle(&sim, Status::FIFO_IN_COPYING, PollBudget::polls(3)).unwrap();
        assert_eq!(polls, 1);
    }

    #[test]
    fn stuck_device_times_out_at_budget() {
        let sim = SimulatedCoprocessor::new();
        sim.force_status(Status::FIFO_OUT_COPYING);
        let res = wait_idle(&sim, Status::FIFO_OUT_COPYING, PollBudget::polls(5));
        assert_eq!(res, Err(DriverError::Timeout));
        assert_eq!(sim.status_reads(), 5);
    }

    #[test]
    fn unrelated_busy_bit_is_ignored() {
        let sim = SimulatedCoprocessor::new();
        sim.force_status(Status::FIFO_OUT_COPYING);
        assert!(wait_idle(&sim, Status::FIFO_IN_COPYING, PollBudget::polls(1)).is_ok());
    }
}
