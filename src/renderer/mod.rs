//! WebGPU rendering module
//!
//! Draws the simulation's render snapshot as flat-colored quads.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
