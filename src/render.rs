//! Frame planning.
//!
//! A frame is computed in two steps. [`plan_frame`] turns the frozen
//! [`InputSnapshot`] and the scene graph into a [`FramePlan`]: every matrix,
//! colour and draw range of the frame, with no GPU involved. The context then
//! uploads the plan and issues one draw per [`DrawCall`] (see
//! [`crate::context::Context::submit`]).

use cgmath::{Matrix3, Matrix4, Point3, Vector3, Vector4};

use crate::{
    config::SceneConfig,
    data_structures::{geometry::DrawRange, scene_graph::SceneGraph},
    input::{InputSnapshot, ProjectionKind},
    math,
    resources::texture::{ActiveTexture, TextureState, select_texture},
};

/// One triangle-list draw over a node's vertex range.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall {
    pub name: &'static str,
    pub range: DrawRange,
    pub model_view: Matrix4<f32>,
    pub normal: Matrix3<f32>,
}

#[derive(Clone, Debug)]
pub struct FramePlan {
    pub view: Matrix4<f32>,
    /// OpenGL clip conventions; converted for wgpu on upload.
    pub projection: Matrix4<f32>,
    pub light_position: Vector4<f32>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub texture: ActiveTexture,
    /// Whether the fragment shader modulates with the bound texture.
    ///
    /// Follows the user toggle alone, not the load state: while the image is
    /// loading, or after it failed, the surface is modulated by the checkerboard
    /// rather than drawn untextured.
    pub textured: bool,
    pub draws: Vec<DrawCall>,
}

pub fn view_matrix(snapshot: &InputSnapshot) -> Matrix4<f32> {
    math::look_at(
        snapshot.camera,
        Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    )
}

pub fn projection_matrix(snapshot: &InputSnapshot, aspect: f32, config: &SceneConfig) -> Matrix4<f32> {
    match snapshot.projection {
        ProjectionKind::Perspective => {
            math::perspective(snapshot.fovy, aspect, config.near, config.far)
        }
        ProjectionKind::Orthographic => {
            let half = config.ortho_half_extent;
            math::orthographic(
                -half * aspect,
                half * aspect,
                -half,
                half,
                -config.ortho_depth,
                config.ortho_depth,
            )
        }
    }
}

/**
 * Computes everything a frame draws from the current parameters.
 *
 * `graph` must already carry the snapshot's local transforms (see
 * [`crate::data_structures::scene_graph::CoffeeNodes::apply`]); draw calls come
 * out in node order.
 */
pub fn plan_frame(
    snapshot: &InputSnapshot,
    graph: &SceneGraph,
    aspect: f32,
    image: TextureState,
    config: &SceneConfig,
) -> FramePlan {
    let view = view_matrix(snapshot);
    let projection = projection_matrix(snapshot, aspect, config);

    let draws = graph
        .evaluate(&view)
        .into_iter()
        .map(|node| DrawCall {
            name: node.name,
            range: node.range,
            model_view: node.model_view,
            normal: node.normal,
        })
        .collect();

    FramePlan {
        view,
        projection,
        light_position: snapshot.light.view_position(&view),
        ambient: snapshot.light.ambient.to_rgb(),
        diffuse: snapshot.light.diffuse.to_rgb(),
        specular: snapshot.light.specular.to_rgb(),
        texture: select_texture(snapshot.use_image_texture, image),
        textured: snapshot.use_image_texture,
        draws,
    }
}
