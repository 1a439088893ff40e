//! Event types exchanged with the native event loop.

/// Events sent to the native event loop through its proxy.
///
/// The loop core itself never needs these to make progress; they only wake a
/// blocked native loop so it can run another processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// New work (a task or a timer) was scheduled.
    WakeUp,
    /// Quit was requested.
    Quit,
}

/// What a single processing pass of the loop core did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Number of timers that expired during the pass.
    pub timers_fired: usize,
    /// Number of queued tasks (including queued callbacks) that ran.
    pub tasks_run: usize,
}

impl PassSummary {
    /// Whether the pass did any work at all.
    pub fn is_idle(&self) -> bool {
        self.timers_fired == 0 && self.tasks_run == 0
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: PassSummary) {
        self.timers_fired += other.timers_fired;
        self.tasks_run += other.tasks_run;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pass_is_idle() {
        assert!(PassSummary::default().is_idle());
    }

    #[test]
    fn test_merge_accumulates() {
        let mut total = PassSummary::default();
        total.merge(PassSummary { timers_fired: 1, tasks_run: 2 });
        total.merge(PassSummary { timers_fired: 0, tasks_run: 3 });
        assert_eq!(total, PassSummary { timers_fired: 1, tasks_run: 5 });
        assert!(!total.is_idle());
    }
}
