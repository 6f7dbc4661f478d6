/// Ties a feed subscription's lifetime to its owning view.
///
/// A view opens a subscription on mount and must close it exactly once on
/// teardown, however teardown happens (navigation, error, fast remount).
/// A leaked subscription causes duplicate event delivery on the next
/// mount. The guard runs its release closure on drop, or earlier via
/// [`release`](SubscriptionGuard::release); either way it runs once.
pub struct SubscriptionGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release now instead of at end of scope.
    pub fn release(mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn releases_exactly_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let _guard = SubscriptionGuard::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_is_not_doubled_by_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let guard = SubscriptionGuard::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        guard.release();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
