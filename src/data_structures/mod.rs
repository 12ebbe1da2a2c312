//! Scene data: geometry, the coffee-machine model, transforms and textures.
//!
//! - `geometry` accumulates boxes into four shared vertex attribute buffers
//! - `machine` builds the coffee-machine model out of those boxes
//! - `transform` holds the editable local parameters of a node
//! - `scene_graph` composes node transforms into world and model-view matrices
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod geometry;
pub mod machine;
pub mod scene_graph;
pub mod texture;
pub mod transform;
