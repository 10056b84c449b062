use crate::error::MatchError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag shared with the caller of a matching run, through which
/// the run may be cancelled from another thread.
///
/// The flag is checked between observation-pair evaluations.
/// A cancelled run returns [`MatchError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn check(&self) -> Result<(), MatchError> {
        if self.is_cancelled() {
            return Err(MatchError::Cancelled);
        }

        Ok(())
    }
}
