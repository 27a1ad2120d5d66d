use bridge_primitives::Address;

/// Who is calling and when.
///
/// `height` drives the epoch scheduler; `timestamp` is stamped into periods
/// and otherwise not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Identity of the caller.
    pub caller: Address,
    /// Chain height the call executes at.
    pub height: u64,
    /// Wall-clock seconds supplied by the caller.
    pub timestamp: u64,
}

impl CallContext {
    /// Context at `height` with a zero timestamp.
    pub fn new(caller: Address, height: u64) -> Self {
        Self {
            caller,
            height,
            timestamp: 0,
        }
    }

    /// Returns the same context with `timestamp` set.
    pub fn at(self, timestamp: u64) -> Self {
        Self { timestamp, ..self }
    }
}
