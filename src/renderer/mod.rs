//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into a colored triangle list in
//! playfield pixels; the pipeline maps pixels to clip space and draws it.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_scene;
pub use vertex::Vertex;
