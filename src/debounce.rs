use std::time::{Duration, Instant};

/// Trailing debounce driven by the event loop's clock.
///
/// At most one deadline is pending. Scheduling again pushes the deadline out; `poll`
/// fires once the quiet period has elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// (Re)start the quiet period at `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Drop the pending deadline; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Fire if the deadline has passed; firing clears it
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.schedule(start);

        assert!(!debouncer.poll(start + Duration::from_millis(499)));
        assert!(debouncer.poll(start + QUIET));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_reschedule_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(400));

        assert!(!debouncer.poll(start + Duration::from_millis(600)));
        assert!(debouncer.poll(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);

        assert!(!debouncer.cancel());
        debouncer.schedule(start);
        assert!(debouncer.cancel());
        assert!(!debouncer.poll(start + QUIET));
    }
}
