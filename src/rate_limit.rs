//! Cooldown gate for side-effecting actions.
//!
//! Each `execute` mapping carries its own gate. A zero cooldown means
//! unlimited; otherwise a firing is allowed once the configured interval
//! has elapsed since the last allowed firing. Denial is silent and leaves
//! the gate untouched, so a burst of denied triggers does not push the
//! next allowed firing further out.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown: Duration,
    last_run: Option<Instant>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_run: None,
        }
    }

    /// A gate that always allows.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Check the gate against the wall clock, recording the firing if allowed.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Clock-injected variant of [`allow`](Self::allow).
    pub fn allow_at(&mut self, now: Instant) -> bool {
        if !self.cooldown.is_zero() {
            if let Some(last) = self.last_run {
                if now.saturating_duration_since(last) < self.cooldown {
                    return false;
                }
            }
        }
        self.last_run = Some(now);
        true
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cooldown_always_allows() {
        let mut gate = CooldownGate::unlimited();
        let t0 = Instant::now();
        assert!(gate.allow_at(t0));
        assert!(gate.allow_at(t0));
        assert!(gate.allow_at(t0 + Duration::from_millis(1)));
    }

    #[test]
    fn allows_only_after_cooldown_elapses() {
        let mut gate = CooldownGate::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(gate.allow_at(t0));
        assert!(!gate.allow_at(t0 + Duration::from_secs(3)));
        assert!(gate.allow_at(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn denial_does_not_mutate_last_run() {
        let mut gate = CooldownGate::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(gate.allow_at(t0));
        assert!(!gate.allow_at(t0 + Duration::from_secs(3)));
        assert_eq!(gate.last_run(), Some(t0));
        // The window is measured from the allowed firing, not the denial
        assert!(gate.allow_at(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn exact_boundary_is_allowed() {
        let mut gate = CooldownGate::new(Duration::from_secs(2));
        let t0 = Instant::now();
        assert!(gate.allow_at(t0));
        assert!(gate.allow_at(t0 + Duration::from_secs(2)));
    }
}
