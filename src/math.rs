//! Degree-based matrix constructors and uniform-layout helpers.
//!
//! Everything here is a thin layer over `cgmath` that fixes the conventions the
//! rest of the crate relies on:
//!
//! - angles are given in degrees
//! - transform chains are built `Parent * Child`
//! - projections follow OpenGL clip space; [`OPENGL_TO_WGPU_MATRIX`] is applied
//!   only when a projection is uploaded to the GPU
//! - flattened matrices are column-major, matching WGSL

use cgmath::{Deg, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector3, Zero};

/// Remaps OpenGL clip depth `[-1, 1]` to the `[0, 1]` range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

pub fn translate(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

pub fn rotate_x(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(degrees))
}

pub fn rotate_y(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_y(Deg(degrees))
}

pub fn rotate_z(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(degrees))
}

pub fn scale(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(x, y, z)
}

/// Right-handed view matrix looking from `eye` at `center`.
pub fn look_at(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::look_at_rh(eye, center, up)
}

pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::perspective(Deg(fovy_degrees), aspect, near, far)
}

pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    cgmath::ortho(left, right, bottom, top, near, far)
}

pub fn upper_left(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Normal transform for `model_view`.
///
/// With `invert` set this is the transpose of the inverse of the upper-left 3x3,
/// which keeps normals perpendicular under non-uniform scale. Without it the
/// upper-left 3x3 is returned as is, which is only correct for rigid transforms.
///
/// A singular matrix (zero scale) has no inverse; the result is then all zeros.
pub fn normal_matrix(model_view: &Matrix4<f32>, invert: bool) -> Matrix3<f32> {
    let m = upper_left(model_view);
    if !invert {
        return m;
    }
    m.invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::zero)
}

pub fn flatten4(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    (*m).into()
}

/// WGSL aligns every `mat3x3` column to 16 bytes, hence the padded columns.
pub fn flatten3_padded(m: &Matrix3<f32>) -> [[f32; 4]; 3] {
    [
        m.x.extend(0.0).into(),
        m.y.extend(0.0).into(),
        m.z.extend(0.0).into(),
    ]
}
