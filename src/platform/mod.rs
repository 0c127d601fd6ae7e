//! Platform abstraction layer
//!
//! Handles browser/native differences for frame scheduling. On the web the
//! scheduler wraps `requestAnimationFrame`; natively (and in tests) frames are
//! pumped by hand.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Identifies one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// "Call me back on the next display refresh"
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a request that has not fired yet; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by an explicit loop: requests queue up until the driver
/// takes them with [`ManualScheduler::take_due`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    /// Total cancellations, for diagnostics
    pub canceled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request, removed from the queue
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        (!self.pending.is_empty()).then(|| self.pending.remove(0))
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.canceled += 1;
        }
    }
}
