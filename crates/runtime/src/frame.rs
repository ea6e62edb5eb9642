use foundation::time::Time;

/// Metadata for one host repaint.
///
/// The headless host advances time in fixed steps so a run can be replayed
/// frame for frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based repaint index.
    pub index: u64,
    /// Host time at the start of the repaint (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, time: Time) -> Self {
        Self { index, time }
    }
}

/// Fixed-step frame source.
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt_s: f64,
    next_index: u64,
}

impl FrameClock {
    pub fn new(dt_s: f64) -> Self {
        Self {
            dt_s,
            next_index: 0,
        }
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    /// Frames handed out so far.
    pub fn frames_elapsed(&self) -> u64 {
        self.next_index
    }

    pub fn tick(&mut self) -> Frame {
        let index = self.next_index;
        self.next_index += 1;
        Frame::new(index, Time(index as f64 * self.dt_s))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
