/// Coalesces repaint requests between host frames.
///
/// Any number of requests made while a repaint is pending collapse into one.
#[derive(Debug, Default, Clone)]
pub struct RepaintScheduler {
    pending: bool,
    requested: u64,
}

impl RepaintScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.pending = true;
        self.requested += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending repaint, if any.
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    /// Total requests seen, including coalesced ones.
    pub fn requested(&self) -> u64 {
        self.requested
    }
}
