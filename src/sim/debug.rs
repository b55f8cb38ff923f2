//! Breakpoint flags for the simulator.
//!
//! Every address carries a [`BpState`]. The third state,
//! [`BpState::PendingRearm`], exists solely so that a breakpoint the
//! machine is currently stopped at does not re-trigger on the immediate
//! next [`run`] without an intervening pass over a different address.
//! The re-arm handshake itself lives in the run loop; this module only
//! provides the table.
//!
//! [`run`]: crate::sim::Simulator::run

const N: usize = 1 << 16;

/// The state of one address's breakpoint flag.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum BpState {
    /// No breakpoint at this address.
    #[default]
    Unset,
    /// A breakpoint that will stop continuous execution just before the
    /// flagged instruction executes.
    Armed,
    /// A breakpoint that has just triggered and is suppressed until
    /// execution next moves onto this address.
    PendingRearm,
}

/// The per-address breakpoint table.
#[derive(Debug)]
pub struct Breakpoints {
    flags: Box<[BpState; N]>,
}

impl Breakpoints {
    /// Creates a table with every address unset.
    pub fn new() -> Self {
        Self {
            flags: vec![BpState::Unset; N]
                .into_boxed_slice()
                .try_into()
                .unwrap_or_else(|_| unreachable!("vec should have had {N} elements")),
        }
    }

    /// Arms a breakpoint at the given address.
    ///
    /// Idempotent; also forces a `PendingRearm` flag back to `Armed`.
    pub fn set(&mut self, addr: u16) {
        self.flags[usize::from(addr)] = BpState::Armed;
    }

    /// Removes the breakpoint at the given address, whatever its state.
    pub fn unset(&mut self, addr: u16) {
        self.flags[usize::from(addr)] = BpState::Unset;
    }

    /// The flag state at the given address.
    pub fn state(&self, addr: u16) -> BpState {
        self.flags[usize::from(addr)]
    }

    /// Whether a breakpoint (armed or pending) exists at the given address.
    pub fn is_set(&self, addr: u16) -> bool {
        self.state(addr) != BpState::Unset
    }

    /// Suppresses a just-triggered breakpoint. Run-loop bookkeeping.
    pub(crate) fn suppress(&mut self, addr: u16) {
        self.flags[usize::from(addr)] = BpState::PendingRearm;
    }

    /// Re-arms a suppressed breakpoint once execution lands on it again.
    /// Leaves the other states alone.
    pub(crate) fn rearm(&mut self, addr: u16) {
        let flag = &mut self.flags[usize::from(addr)];
        if *flag == BpState::PendingRearm {
            *flag = BpState::Armed;
        }
    }
}
impl Default for Breakpoints {
    fn default() -> Self {
        Self::new()
    }
}
