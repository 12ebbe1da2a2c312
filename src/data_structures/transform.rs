//! Editable local transform parameters of a scene node.

use cgmath::{Matrix4, Vector3};

use crate::math;

/// Translation, rotation (degrees about x, y, z) and uniform scale.
///
/// The parameters are kept separately rather than as a matrix because input
/// edits them one scalar at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

impl Transform {
    /// The identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    /**
     * Composes `T · RotY · RotX · RotZ · S`.
     *
     * Translation is outermost and scale innermost; the rotation order (y, then
     * x, then z) is fixed and matters for non-trivial angles.
     */
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let t = self.translation;
        math::translate(t.x, t.y, t.z)
            * math::rotate_y(self.rotation.y)
            * math::rotate_x(self.rotation.x)
            * math::rotate_z(self.rotation.z)
            * math::scale(self.scale, self.scale, self.scale)
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(translation: Vector3<f32>) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
