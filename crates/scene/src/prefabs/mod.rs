pub mod light_beam;

pub use light_beam::*;
