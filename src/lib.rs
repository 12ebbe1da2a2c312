//! coffee-scene
//!
//! An interactive, lit and textured coffee machine rendered with wgpu on native
//! windows and in the browser (WebGL2). The model is assembled from coloured
//! boxes, arranged in a small transform hierarchy, and drawn every frame from a
//! frozen snapshot of the user's controls.
//!
//! High-level modules
//! - `math`: degree-based matrix constructors and GPU layout helpers
//! - `data_structures`: box geometry, the coffee-machine model, transforms,
//!   the scene graph and GPU textures
//! - `input`: user controls, named input events and keyboard bindings
//! - `animation`: the falling coffee stream and auto-rotation
//! - `render`: turns a snapshot and the scene graph into a frame plan
//! - `context`: central GPU and window context that owns device, queue and
//!   the scene pipeline
//! - `pipelines`: the scene pipeline, its uniforms and light parameters
//! - `resources`: checkerboard and image texture loading
//! - `flow`: the event loop driving all of the above
//!

pub mod animation;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod math;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use config::SceneConfig;
pub use flow::{InputProxy, run, run_with};
pub use input::InputEvent;
pub use wgpu;
