pub mod camera;
pub mod components;
pub mod entity;
pub mod mesh;
pub mod prefabs;
pub mod world;

pub use camera::*;
pub use entity::*;
pub use mesh::*;
pub use world::*;
