//! Board cycle-counter stopwatch.

/// Start/stop window over a caller-supplied cycle source, mirroring the
/// firmware timer contract: the reading is the distance from start to
/// stop, and an inverted window reads as zero.
///
/// The cycle source is typically a closure over [`RemoteBoard`] reading
/// the counter's memory-mapped register.
///
/// [`RemoteBoard`]: crate::board::RemoteBoard
pub struct CycleTimer<F> {
    rdcycle: F,
    start_cycle: u64,
    stop_cycle: u64,
}

impl<F: Fn() -> u64> CycleTimer<F> {
    pub fn new(rdcycle: F) -> Self {
        Self { rdcycle, start_cycle: 0, stop_cycle: 0 }
    }

    /// Latches the current cycle count as the window start.
    pub fn start(&mut self) {
        self.start_cycle = (self.rdcycle)();
    }

    /// Latches the current cycle count as the window end.
    pub fn stop(&mut self) {
        self.stop_cycle = (self.rdcycle)();
    }

    /// Clears both ends of the window.
    pub fn reset(&mut self) {
        self.start_cycle = 0;
        self.stop_cycle = 0;
    }

    /// Cycles between start and stop. A stop earlier than the start means
    /// the counter wrapped or the window was misused; that reads as zero
    /// rather than a huge bogus count.
    pub fn elapsed(&self) -> u64 {
        if self.start_cycle > self.stop_cycle {
            return 0;
        }
        self.stop_cycle - self.start_cycle
    }
}
