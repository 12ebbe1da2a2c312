mod common;

use cgmath::{Matrix3, SquareMatrix, Vector4, Zero};
use coffee_scene::{
    data_structures::transform::Transform,
    math::{self, OPENGL_TO_WGPU_MATRIX},
};

use crate::common::test_utils::{assert_mat3_near, assert_mat4_near, assert_near};

#[test]
fn normal_matrix_of_a_rotation_is_the_rotation() {
    let rotation = math::rotate_y(30.0) * math::rotate_x(-45.0);
    let normal = math::normal_matrix(&rotation, true);
    assert_mat3_near(&normal, &math::upper_left(&rotation));
}

#[test]
fn normal_matrix_undoes_non_uniform_scale() {
    let m = math::scale(2.0, 4.0, 1.0);
    let normal = math::normal_matrix(&m, true);
    let expected = Matrix3::from_diagonal(cgmath::Vector3::new(0.5, 0.25, 1.0));
    assert_mat3_near(&normal, &expected);

    // without the inversion the plain upper-left block comes back
    let plain = math::normal_matrix(&m, false);
    assert_mat3_near(&plain, &math::upper_left(&m));
}

#[test]
fn normal_matrix_of_a_singular_transform_is_zero() {
    let m = math::scale(0.0, 0.0, 0.0);
    assert_mat3_near(&math::normal_matrix(&m, true), &Matrix3::zero());
}

#[test]
fn rotations_do_not_commute() {
    let xy = math::rotate_x(90.0) * math::rotate_y(90.0);
    let yx = math::rotate_y(90.0) * math::rotate_x(90.0);
    let diff: f32 = (0..4)
        .flat_map(|c| (0..4).map(move |r| (c, r)))
        .map(|(c, r)| (xy[c][r] - yx[c][r]).abs())
        .sum();
    assert!(diff > 0.5);
}

#[test]
fn transform_composes_translation_outermost_and_scale_innermost() {
    let t = Transform {
        translation: cgmath::Vector3::new(1.0, 2.0, 3.0),
        rotation: cgmath::Vector3::new(10.0, 20.0, 30.0),
        scale: 0.5,
    };
    let expected = math::translate(1.0, 2.0, 3.0)
        * math::rotate_y(20.0)
        * math::rotate_x(10.0)
        * math::rotate_z(30.0)
        * math::scale(0.5, 0.5, 0.5);
    assert_mat4_near(&t.to_matrix(), &expected);
    assert_mat4_near(&Transform::default().to_matrix(), &math::identity());
}

#[test]
fn wgpu_correction_maps_opengl_depth_to_unit_range() {
    let projection = OPENGL_TO_WGPU_MATRIX * math::perspective(45.0, 1.0, 0.1, 100.0);
    let near = projection * Vector4::new(0.0, 0.0, -0.1, 1.0);
    let far = projection * Vector4::new(0.0, 0.0, -100.0, 1.0);
    assert_near(near.z / near.w, 0.0);
    assert_near(far.z / far.w, 1.0);
}

#[test]
fn padded_normal_columns_keep_values_and_zero_the_fourth_lane() {
    let m = math::upper_left(&math::rotate_z(90.0));
    let padded = math::flatten3_padded(&m);
    for (c, column) in padded.iter().enumerate() {
        assert_eq!(column[3], 0.0);
        for r in 0..3 {
            assert_eq!(column[r], m[c][r]);
        }
    }
}
