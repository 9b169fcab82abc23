// src/engine/debounce.rs

/// Restartable debounce bookkeeping for the pure core.
///
/// The core never sleeps. Arming hands out a fresh *generation*; the IO
/// shell starts a timer tagged with it and reports back when it elapses.
/// Only the most recently armed generation may fire, so a timer that the
/// shell failed to cancel in time is ignored here.
#[derive(Debug, Default)]
pub struct Debouncer {
    generation: u64,
    armed: Option<u64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the quiet period. Returns the generation the timer must carry.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.armed = Some(self.generation);
        self.generation
    }

    /// Consume an elapsed timer. Returns `true` only for the armed
    /// generation, which disarms the debouncer.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.armed == Some(generation) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }
}
