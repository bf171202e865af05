//! Frame-coalesced redraw scheduling.
//!
//! Resize events can arrive many times per display frame. The scheduler
//! keeps a single pending flag: the first request asks the host for a frame,
//! later requests in the same frame are dropped, and the redraw runs once
//! when the host delivers the frame.

/// Host facility that delivers a callback before the next display refresh.
///
/// Implementations must eventually call back into
/// [`PictareaController::on_animation_frame`](crate::PictareaController::on_animation_frame)
/// exactly once per accepted request, and never from inside `request_frame` itself.
pub trait FrameHost {
    /// Ask for a frame callback. Returns `false` when no frame will be delivered.
    fn request_frame(&self) -> bool;
}

/// Outcome of [`RenderScheduler::request_redraw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawRequest {
    /// A frame was requested; the redraw runs when it arrives
    Deferred,
    /// A redraw is already pending for the next frame
    Coalesced,
    /// No frame host, or it could not schedule a frame: the caller must redraw now
    Immediate,
    /// The overlay has been destroyed
    Ignored,
}

/// Single-flight redraw scheduler.
#[derive(Default)]
pub struct RenderScheduler {
    host: Option<Box<dyn FrameHost>>,
    pending: bool,
    destroyed: bool,
}

impl RenderScheduler {
    pub fn new(host: Box<dyn FrameHost>) -> Self {
        Self {
            host: Some(host),
            pending: false,
            destroyed: false,
        }
    }

    /// A scheduler without frame support; every request redraws synchronously.
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn set_host(&mut self, host: Box<dyn FrameHost>) {
        self.host = Some(host);
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn request_redraw(&mut self) -> RedrawRequest {
        if self.destroyed {
            return RedrawRequest::Ignored;
        }
        if self.pending {
            return RedrawRequest::Coalesced;
        }
        match &self.host {
            Some(host) if host.request_frame() => {
                self.pending = true;
                RedrawRequest::Deferred
            }
            Some(_) => {
                log::debug!("Frame host could not schedule a frame, redrawing now");
                RedrawRequest::Immediate
            }
            None => RedrawRequest::Immediate,
        }
    }

    /// Consume the pending flag when a frame arrives. Returns whether a redraw should run.
    pub fn take_frame(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        pending && !self.destroyed
    }

    /// Make any frame still in flight a no-op.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("host", &self.host.is_some())
            .field("pending", &self.pending)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Frame host that only counts requests; tests deliver frames by hand.
    #[derive(Clone, Default)]
    pub(crate) struct CountingHost {
        pub requests: Rc<Cell<usize>>,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&self) -> bool {
            self.requests.set(self.requests.get() + 1);
            true
        }
    }

    /// Frame host without frame support, e.g. no window to schedule on.
    #[derive(Clone, Default)]
    pub(crate) struct UnavailableHost {
        pub requests: Rc<Cell<usize>>,
    }

    impl FrameHost for UnavailableHost {
        fn request_frame(&self) -> bool {
            self.requests.set(self.requests.get() + 1);
            false
        }
    }

    #[test]
    fn test_requests_coalesce_within_a_frame() {
        let host = CountingHost::default();
        let mut scheduler = RenderScheduler::new(Box::new(host.clone()));

        assert_eq!(scheduler.request_redraw(), RedrawRequest::Deferred);
        for _ in 0..10 {
            assert_eq!(scheduler.request_redraw(), RedrawRequest::Coalesced);
        }
        assert_eq!(host.requests.get(), 1);

        assert!(scheduler.take_frame());
        assert!(!scheduler.take_frame());

        // Next frame can be requested again
        assert_eq!(scheduler.request_redraw(), RedrawRequest::Deferred);
        assert_eq!(host.requests.get(), 2);
    }

    #[test]
    fn test_without_host_redraws_immediately() {
        let mut scheduler = RenderScheduler::immediate();
        assert_eq!(scheduler.request_redraw(), RedrawRequest::Immediate);
        assert_eq!(scheduler.request_redraw(), RedrawRequest::Immediate);
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take_frame());
    }

    #[test]
    fn test_unavailable_host_falls_back_to_immediate() {
        let host = UnavailableHost::default();
        let mut scheduler = RenderScheduler::new(Box::new(host.clone()));

        for _ in 0..3 {
            assert_eq!(scheduler.request_redraw(), RedrawRequest::Immediate);
            assert!(!scheduler.is_pending());
        }
        // Every request is retried rather than stuck behind a lost frame
        assert_eq!(host.requests.get(), 3);
        assert!(!scheduler.take_frame());
    }

    #[test]
    fn test_destroy_cancels_pending_frame() {
        let host = CountingHost::default();
        let mut scheduler = RenderScheduler::new(Box::new(host.clone()));

        scheduler.request_redraw();
        scheduler.destroy();
        assert!(!scheduler.take_frame());
        assert_eq!(scheduler.request_redraw(), RedrawRequest::Ignored);
        assert_eq!(host.requests.get(), 1);
    }
}
