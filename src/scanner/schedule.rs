//! Cooperative scheduling primitives for the scanner.
//!
//! The scanner never sleeps or spawns. Instead the host drives it
//! frame by frame, and these types decide when a burst of work must
//! yield and when a debounced batch becomes due. Time comes from an
//! injected [`Clock`] so the whole thing is testable without a real
//! event loop.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the scanner.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

/// The "yield now?" predicate consulted between chunks
pub trait YieldPolicy: Send {
    /// Called when a frame's worth of work starts
    fn begin_frame(&mut self);

    /// Whether the current frame has used up its allowance
    fn should_yield(&mut self) -> bool;
}

/// Yields once a frame has run longer than its time budget
pub struct FrameBudget {
    clock: Arc<dyn Clock>,
    budget: Duration,
    frame_start: Duration,
}

impl FrameBudget {
    pub fn new(clock: Arc<dyn Clock>, budget: Duration) -> Self {
        let frame_start = clock.now();
        Self {
            clock,
            budget,
            frame_start,
        }
    }
}

impl YieldPolicy for FrameBudget {
    fn begin_frame(&mut self) {
        self.frame_start = self.clock.now();
    }

    fn should_yield(&mut self) -> bool {
        self.clock.now().saturating_sub(self.frame_start) >= self.budget
    }
}

/// Yields after a fixed number of chunks per frame
#[derive(Debug, Clone)]
pub struct YieldAfterChunks {
    chunks_per_frame: usize,
    seen: usize,
}

impl YieldAfterChunks {
    pub fn new(chunks_per_frame: usize) -> Self {
        Self {
            chunks_per_frame: chunks_per_frame.max(1),
            seen: 0,
        }
    }
}

impl YieldPolicy for YieldAfterChunks {
    fn begin_frame(&mut self) {
        self.seen = 0;
    }

    fn should_yield(&mut self) -> bool {
        self.seen += 1;
        self.seen >= self.chunks_per_frame
    }
}

/// Trailing-edge debounce timer
///
/// Every trigger pushes the deadline out by `delay`; the batch fires
/// once the clock passes the last deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending trigger if its deadline has passed
    pub fn take_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// FIFO queue that ignores items already waiting in it
#[derive(Debug, Clone)]
pub struct WorkQueue<T> {
    items: VecDeque<T>,
    queued: HashSet<T>,
}

impl<T: Copy + Eq + Hash> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            queued: HashSet::new(),
        }
    }

    /// Enqueue an item, returning false if it was already waiting
    pub fn push(&mut self, item: T) -> bool {
        if !self.queued.insert(item) {
            return false;
        }
        self.items.push_back(item);
        true
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_front()?;
        self.queued.remove(&item);
        Some(item)
    }

    /// Remove up to `n` items from the front
    pub fn take_chunk(&mut self, n: usize) -> Vec<T> {
        let mut chunk = Vec::with_capacity(n.min(self.items.len()));
        while chunk.len() < n {
            match self.pop() {
                Some(item) => chunk.push(item),
                None => break,
            }
        }
        chunk
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.queued.clear();
    }
}

impl<T: Copy + Eq + Hash> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
