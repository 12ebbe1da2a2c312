#![allow(dead_code)]

use cgmath::{Matrix3, Matrix4, Vector3, Vector4};

pub const EPS: f32 = 1e-4;

pub fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_vec3_near(actual: Vector3<f32>, expected: Vector3<f32>) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }
}

pub fn assert_mat3_near(actual: &Matrix3<f32>, expected: &Matrix3<f32>) {
    for c in 0..3 {
        for r in 0..3 {
            assert!(
                (actual[c][r] - expected[c][r]).abs() < EPS,
                "column {c}, row {r}: expected {expected:?}, got {actual:?}"
            );
        }
    }
}

pub fn assert_mat4_near(actual: &Matrix4<f32>, expected: &Matrix4<f32>) {
    for c in 0..4 {
        for r in 0..4 {
            assert!(
                (actual[c][r] - expected[c][r]).abs() < EPS,
                "column {c}, row {r}: expected {expected:?}, got {actual:?}"
            );
        }
    }
}

/// Transforms a model-space point by `m`.
pub fn transform_point(m: &Matrix4<f32>, p: [f32; 3]) -> Vector3<f32> {
    (m * Vector4::new(p[0], p[1], p[2], 1.0)).truncate()
}

/// Centroid of a run of positions.
pub fn centroid(positions: &[[f32; 3]]) -> Vector3<f32> {
    let sum = positions
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| {
            acc + Vector3::new(p[0], p[1], p[2])
        });
    sum / positions.len() as f32
}

pub fn min_y(positions: &[[f32; 3]]) -> f32 {
    positions.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min)
}
