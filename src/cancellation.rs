use anyhow::{Result, bail};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared flag telling the timers of one page transition to stand down.
#[derive(Clone, Debug)]
pub struct TransitionToken {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl TransitionToken {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check_cancelled(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            bail!(
                "transition {} cancelled at stage={stage}",
                self.generation
            );
        }
        Ok(())
    }
}
