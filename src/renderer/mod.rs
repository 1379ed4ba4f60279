//! WebGPU rendering module
//!
//! Bodies and forecast dots are tessellated on the CPU into one triangle list
//! per frame (see [`scene::build`]) and drawn with a flat-color pipeline.

pub mod overlay;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use overlay::{Dot, Overlay};
pub use pipeline::RenderState;
pub use scene::SceneStyle;
pub use vertex::Vertex;
pub use viewport::Viewport;
