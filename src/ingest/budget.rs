//! Aggregate byte budget for session attachments.
//!
//! The tracker holds only the running total, not per-file records. Callers
//! ask [`SizeBudget::admit`] before encoding and [`SizeBudget::commit`] only
//! once the encode succeeded, so a failed read never consumes budget.

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The candidate fits under the cap.
    Allow,
    /// The candidate does not fit; `remaining` bytes are still available.
    Deny { remaining: u64 },
}

/// Running total of accepted attachment bytes against a fixed cap.
#[derive(Debug, Clone)]
pub struct SizeBudget {
    cap: u64,
    total: u64,
}

impl SizeBudget {
    pub fn new(cap: u64) -> Self {
        Self { cap, total: 0 }
    }

    /// Check whether `candidate` more bytes fit. Does not change the total.
    pub fn admit(&self, candidate: u64) -> Admission {
        match self.total.checked_add(candidate) {
            Some(sum) if sum <= self.cap => Admission::Allow,
            _ => Admission::Deny {
                remaining: self.remaining(),
            },
        }
    }

    /// Add an accepted file's size to the running total.
    pub fn commit(&mut self, size: u64) {
        self.total = self.total.saturating_add(size);
    }

    /// Subtract a removed file's size from the running total.
    pub fn release(&mut self, size: u64) {
        self.total = self.total.saturating_sub(size);
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn remaining(&self) -> u64 {
        self.cap.saturating_sub(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_admit_up_to_cap_inclusive() {
        let mut b = SizeBudget::new(15 * MB);
        assert_eq!(b.admit(15 * MB), Admission::Allow);
        b.commit(10 * MB);
        assert_eq!(b.admit(5 * MB), Admission::Allow);
        assert_eq!(b.admit(6 * MB), Admission::Deny { remaining: 5 * MB });
    }

    #[test]
    fn test_admit_does_not_mutate() {
        let b = SizeBudget::new(100);
        let _ = b.admit(50);
        assert_eq!(b.total(), 0);
    }

    #[test]
    fn test_release_restores_headroom() {
        let mut b = SizeBudget::new(100);
        b.commit(60);
        b.commit(30);
        b.release(60);
        assert_eq!(b.total(), 30);
        assert_eq!(b.remaining(), 70);
    }

    #[test]
    fn test_overflowing_candidate_is_denied() {
        let mut b = SizeBudget::new(u64::MAX);
        b.commit(10);
        assert_eq!(b.admit(u64::MAX), Admission::Deny { remaining: u64::MAX - 10 });
    }
}
