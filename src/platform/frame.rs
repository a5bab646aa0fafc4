//! Animation-frame scheduling
//!
//! The loop is "run a frame, then request the next one". Stopping cancels the
//! outstanding request, so no further frames run until the loop is resumed.

/// Something that can schedule a callback for the next display refresh
pub trait FrameRequester {
    type Handle: Copy + PartialEq + std::fmt::Debug;

    /// Ask for the next frame; `None` if the platform refused
    fn request(&mut self) -> Option<Self::Handle>;

    /// Cancel a previously requested frame
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState<H> {
    Idle,
    Pending(H),
    Running,
    Stopped,
}

/// Frame loop driven by a [`FrameRequester`]
#[derive(Debug)]
pub struct FrameLoop<R: FrameRequester> {
    requester: R,
    state: LoopState<R::Handle>,
}

impl<R: FrameRequester> FrameLoop<R> {
    pub fn new(requester: R) -> Self {
        Self {
            requester,
            state: LoopState::Idle,
        }
    }

    /// Request the first frame. Does nothing once stopped or already started.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.schedule();
        }
    }

    /// Called at the top of a frame callback. Returns false if the loop has
    /// been stopped and the frame should be skipped.
    pub fn begin_frame(&mut self) -> bool {
        match self.state {
            LoopState::Stopped => false,
            _ => {
                self.state = LoopState::Running;
                true
            }
        }
    }

    /// Request the next frame after the current one finished
    pub fn schedule_next(&mut self) {
        if self.state == LoopState::Running {
            self.schedule();
        }
    }

    /// Cancel the pending frame and refuse to schedule more
    pub fn stop(&mut self) {
        if let LoopState::Pending(handle) = self.state {
            self.requester.cancel(handle);
        }
        if self.state != LoopState::Stopped {
            log::info!("Frame loop stopped");
        }
        self.state = LoopState::Stopped;
    }

    /// Leave the stopped state and request a frame again
    pub fn resume(&mut self) {
        if self.state == LoopState::Stopped {
            self.state = LoopState::Idle;
            self.schedule();
            log::info!("Frame loop resumed");
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LoopState::Pending(_))
    }

    pub fn is_stopped(&self) -> bool {
        self.state == LoopState::Stopped
    }

    fn schedule(&mut self) {
        self.state = match self.requester.request() {
            Some(handle) => LoopState::Pending(handle),
            None => {
                log::warn!("Animation frame request failed, loop halted");
                LoopState::Stopped
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeFrames {
        next: u32,
        live: Vec<u32>,
        cancelled: Vec<u32>,
        refuse: bool,
    }

    impl FrameRequester for FakeFrames {
        type Handle = u32;

        fn request(&mut self) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            self.live.push(self.next);
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.live.retain(|&h| h != handle);
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn test_run_then_request_next() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        assert!(frames.is_pending());

        for _ in 0..3 {
            assert!(frames.begin_frame());
            frames.schedule_next();
        }
        assert_eq!(frames.requester.next, 4);
    }

    #[test]
    fn test_start_twice_requests_once() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        frames.start();
        assert_eq!(frames.requester.next, 1);
    }

    #[test]
    fn test_stop_cancels_pending_request() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        frames.stop();

        assert!(frames.is_stopped());
        assert_eq!(frames.requester.cancelled, vec![1]);
        assert!(!frames.begin_frame());

        frames.schedule_next();
        frames.start();
        assert_eq!(frames.requester.next, 1);
    }

    #[test]
    fn test_stop_during_frame_prevents_next() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        assert!(frames.begin_frame());
        frames.stop();
        frames.schedule_next();
        assert_eq!(frames.requester.next, 1);
        assert!(frames.requester.cancelled.is_empty());
    }

    #[test]
    fn test_resume_after_stop() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        frames.stop();

        frames.resume();
        assert!(frames.is_pending());
        assert_eq!(frames.requester.live, vec![2]);
        assert!(frames.begin_frame());
        frames.schedule_next();
        assert_eq!(frames.requester.next, 3);
    }

    #[test]
    fn test_resume_while_running_is_noop() {
        let mut frames = FrameLoop::new(FakeFrames::default());
        frames.start();
        frames.resume();
        assert_eq!(frames.requester.next, 1);

        let mut idle = FrameLoop::new(FakeFrames::default());
        idle.resume();
        assert_eq!(idle.requester.next, 0);
    }

    #[test]
    fn test_refused_request_halts() {
        let mut frames = FrameLoop::new(FakeFrames {
            refuse: true,
            ..Default::default()
        });
        frames.start();
        assert!(frames.is_stopped());
    }
}
