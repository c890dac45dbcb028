use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Process-wide capacity limit for background removals.
///
/// Admission is all-or-nothing: callers over capacity are turned away
/// immediately, there is no queue.
#[derive(Debug)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Take a slot without a guard; pair with [`AdmissionGate::leave`].
    pub fn try_enter(&self) -> bool {
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Give a slot back. Never goes below zero, so a double release is harmless.
    pub fn leave(&self) {
        if self.permits.available_permits() < self.capacity {
            self.permits.add_permits(1);
        }
    }

    /// Take a slot as a guard that releases it on drop
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        let permit = Arc::clone(&self.permits).try_acquire_owned().ok()?;
        Some(AdmissionPermit { _permit: permit })
    }

    pub fn active_count(&self) -> usize {
        self.capacity.saturating_sub(self.permits.available_permits())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Holds one gate slot until dropped, including when the owning future is cancelled
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        tracing::debug!("Releasing background removal slot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_rejects_over_capacity() {
        let gate = AdmissionGate::new(2);
        assert!(gate.try_enter());
        assert!(gate.try_enter());
        assert!(!gate.try_enter());
        assert_eq!(gate.active_count(), 2);

        gate.leave();
        assert!(gate.try_enter());
        assert_eq!(gate.active_count(), 2);
    }

    #[test]
    fn test_leave_is_floored_at_zero() {
        let gate = AdmissionGate::new(2);
        gate.leave();
        gate.leave();
        assert_eq!(gate.active_count(), 0);

        assert!(gate.try_enter());
        gate.leave();
        gate.leave();
        assert_eq!(gate.active_count(), 0);
    }

    #[test]
    fn test_permit_releases_on_drop() {
        let gate = Arc::new(AdmissionGate::new(1));
        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.try_acquire().is_none());

        drop(permit);
        assert_eq!(gate.active_count(), 0);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_concurrent_admissions_never_exceed_capacity() {
        let gate = Arc::new(AdmissionGate::new(2));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || gate.try_enter())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(admitted, 2);
        assert_eq!(gate.active_count(), 2);
    }

    #[test]
    fn test_balanced_enter_leave_returns_to_zero() {
        let gate = Arc::new(AdmissionGate::new(2));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        if let Some(permit) = gate.try_acquire() {
                            assert!(gate.active_count() <= gate.capacity());
                            drop(permit);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(gate.active_count(), 0);
    }
}
