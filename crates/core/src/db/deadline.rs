//! Commit cutoffs for store mutations.
//!
//! A tokio-rusqlite call keeps running on the connection thread after its
//! future times out or is dropped. Mutating calls therefore carry a
//! [`Deadline`] that the closure checks before writing and again right before
//! commit; a failed check rolls the transaction back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::Error;

/// Time limit and abandonment flag for one store mutation.
#[derive(Clone, Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
    budget: Duration,
    abandoned: Arc<AtomicBool>,
}

impl Deadline {
    /// No time limit. Abandonment through [`Deadline::arm`] still applies.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn after(budget: Duration) -> Self {
        Self { at: Instant::now().checked_add(budget), budget, abandoned: Arc::default() }
    }

    /// Guard that marks the deadline abandoned once dropped.
    ///
    /// Hold it across the await of the store call so a cancelled caller
    /// cannot have its write land afterwards.
    pub fn arm(&self) -> Armed {
        Armed { abandoned: Arc::clone(&self.abandoned) }
    }

    pub(crate) fn check(&self, op: &str) -> Result<(), Error> {
        if self.abandoned.load(Ordering::Acquire) {
            return Err(Error::Timeout(format!("{op} abandoned by caller")));
        }
        match self.at {
            Some(at) if Instant::now() >= at => {
                Err(Error::Timeout(format!("{op} exceeded {}ms", self.budget.as_millis())))
            }
            _ => Ok(()),
        }
    }
}

/// Drop guard returned by [`Deadline::arm`].
#[must_use = "dropping the guard abandons the call immediately"]
pub struct Armed {
    abandoned: Arc<AtomicBool>,
}

impl Drop for Armed {
    fn drop(&mut self) {
        self.abandoned.store(true, Ordering::Release);
    }
}
