use std::time::Duration;

use crate::variant::TickStyle;

/// Accumulates elapsed time and releases at most one beat per period.
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    accumulated: Duration,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Pacer { period, accumulated: Duration::ZERO }
    }

    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated += elapsed;
        if self.accumulated < self.period {
            return false;
        }

        // Drop whatever is left past one period so a stall can't queue up a burst
        self.accumulated -= self.period;
        if self.accumulated >= self.period {
            self.accumulated = Duration::ZERO;
        }
        true
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Beat {
    pub step: bool,
    pub render: bool,
}

/// Decides when the simulation steps and when a frame is drawn.
#[derive(Debug)]
pub enum TickDriver {
    FrameGated { frame: Pacer, step: Pacer },
    FixedTimer { step: Pacer },
}

impl TickDriver {
    pub fn new(style: TickStyle, step_period: Duration, frame_period: Duration) -> Self {
        match style {
            TickStyle::FrameGated => TickDriver::FrameGated {
                frame: Pacer::new(frame_period),
                step: Pacer::new(step_period),
            },
            TickStyle::FixedTimer => TickDriver::FixedTimer { step: Pacer::new(step_period) },
        }
    }

    /// The simulation pacer only runs while `running`; stopping it clears its
    /// accumulator so a resume waits a full period.
    pub fn poll(&mut self, elapsed: Duration, running: bool) -> Beat {
        match self {
            TickDriver::FrameGated { frame, step } => {
                let render = frame.advance(elapsed);
                let step = gated_step(step, elapsed, running);
                Beat { step, render }
            }
            TickDriver::FixedTimer { step } => {
                let step = gated_step(step, elapsed, running);
                Beat { step, render: step }
            }
        }
    }
}

fn gated_step(pacer: &mut Pacer, elapsed: Duration, running: bool) -> bool {
    if running {
        pacer.advance(elapsed)
    } else {
        pacer.reset();
        false
    }
}
