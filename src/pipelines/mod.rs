//! The scene render pipeline and the data it is fed with.

pub mod basic;
pub mod light;
pub mod uniforms;
