/// Fixed-step driver for hosts that tick at a variable frame rate.
///
/// Host frame deltas are clamped, accumulated, and paid out in whole fixed
/// steps; leftover time carries over to the next frame. A frame that owes
/// `max_steps` or more pays `max_steps` and drops the rest.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    step_s: f32,
    max_frame_dt: f32,
    max_steps: usize,
    accumulator_s: f32,
}

impl FixedStepper {
    pub fn new(step_hz: f32, max_frame_dt: f32, max_steps: usize) -> Self {
        Self {
            step_s: 1.0 / step_hz.max(1.0),
            max_frame_dt: max_frame_dt.max(0.0),
            max_steps: max_steps.max(1),
            accumulator_s: 0.0,
        }
    }

    pub fn step_seconds(&self) -> f32 {
        self.step_s
    }

    pub fn pending_seconds(&self) -> f32 {
        self.accumulator_s
    }

    /// Accumulate a host frame and call `step` once per due fixed step.
    /// Returns the number of steps taken.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_dt: f32, mut step: F) -> usize {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator_s += frame_dt;

        let owed = (self.accumulator_s / self.step_s).floor() as usize;
        let due = owed.min(self.max_steps);
        for _ in 0..due {
            step(self.step_s);
        }
        if owed >= self.max_steps {
            self.accumulator_s = 0.0;
        } else {
            self.accumulator_s = (self.accumulator_s - due as f32 * self.step_s).max(0.0);
        }
        due
    }
}
