//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::fade::FrameClock;
use crate::failsafe::Supervision;
use crate::input::{InputQueue, Inputs};
use crate::{RegisterBus, Renderer};

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Fail-safe verdict of the rendered frame.
    pub supervision: Supervision,
}

/// Portable frame scheduler that manages timing without async.
///
/// Each tick folds the queued input updates into the input snapshot, renders
/// one frame with a fresh frame index and returns timing info so the caller
/// can sleep appropriately.
///
/// # Usage
///
/// ```ignore
/// static INPUTS: InputQueue<16> = InputQueue::new();
///
/// let renderer = Renderer::new(I2cBus::new(i2c), &ControllerConfig::default());
/// let mut scheduler = FrameScheduler::new(renderer, &INPUTS);
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, B: RegisterBus, const QUEUE_SIZE: usize> {
    renderer: Renderer<B>,
    queue: &'a InputQueue<QUEUE_SIZE>,
    inputs: Inputs,
    frame_index: u32,
    blackout: bool,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, B: RegisterBus, const QUEUE_SIZE: usize> FrameScheduler<'a, B, QUEUE_SIZE> {
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (90 FPS) for frame timing.
    pub fn new(renderer: Renderer<B>, queue: &'a InputQueue<QUEUE_SIZE>) -> Self {
        Self::with_frame_duration(renderer, queue, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer<B>,
        queue: &'a InputQueue<QUEUE_SIZE>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            renderer,
            queue,
            inputs: Inputs::default(),
            frame_index: 0,
            blackout: false,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Applies the queued input updates
    /// 3. Renders the frame and flushes it to the PWM driver
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Skip the backlog after a long stall instead of bursting to catch up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.queue.drain_into(&mut self.inputs);

        let clock = FrameClock::new(now, self.frame_index);
        let supervision = if self.blackout {
            self.renderer.blackout(clock);
            self.renderer.supervision()
        } else {
            self.renderer.render(&self.inputs, clock)
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            supervision,
        }
    }

    /// Hold both strips dark regardless of the inputs, e.g. while the
    /// configuration portal is open.
    pub fn set_blackout(&mut self, blackout: bool) {
        self.blackout = blackout;
    }

    pub const fn is_blackout(&self) -> bool {
        self.blackout
    }

    /// Current input snapshot.
    pub const fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Mutable input snapshot, for collaborators living on the render thread.
    pub fn inputs_mut(&mut self) -> &mut Inputs {
        &mut self.inputs
    }

    /// Index of the next frame.
    pub const fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Get a reference to the renderer.
    pub const fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Renderer<B> {
        &mut self.renderer
    }
}
