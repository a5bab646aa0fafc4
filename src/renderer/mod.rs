//! WebGPU rendering module
//!
//! Bodies are tessellated into triangle lists on the CPU and drawn with a
//! flat-color pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use shapes::scene_vertices;
pub use vertex::Vertex;
