pub mod event_bus;
pub mod frame;
pub mod repaint;

pub use event_bus::*;
pub use frame::*;
pub use repaint::*;
