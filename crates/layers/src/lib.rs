pub mod beam;
pub mod compositor;
pub mod config;
pub mod error;
pub mod layer;
pub mod model_transform;
pub mod stack;

pub use beam::*;
pub use compositor::*;
pub use config::*;
pub use error::*;
pub use layer::*;
pub use model_transform::*;
pub use stack::*;
