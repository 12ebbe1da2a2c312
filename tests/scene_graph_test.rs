mod common;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use coffee_scene::{
    data_structures::{
        geometry::{DrawRange, VERTICES_PER_BOX},
        machine::CoffeeMachine,
        scene_graph::{CoffeeNodes, SceneGraph, mk_coffee_scene_graph},
        transform::Transform,
    },
    input::InputSnapshot,
    math,
};

use crate::common::test_utils::{
    assert_mat3_near, assert_mat4_near, assert_near, assert_vec3_near, centroid, min_y,
    transform_point,
};

const FALL: f32 = 0.2;

fn level_snapshot() -> InputSnapshot {
    InputSnapshot {
        root: Transform::new(),
        cup_offset: Vector3::new(0.0, 0.0, 0.0),
        ..InputSnapshot::default()
    }
}

fn setup(snapshot: &InputSnapshot) -> (CoffeeMachine, SceneGraph, CoffeeNodes) {
    let model = CoffeeMachine::build();
    let (mut graph, nodes) = mk_coffee_scene_graph(&model).expect("scene graph");
    nodes.apply(&mut graph, snapshot, FALL);
    (model, graph, nodes)
}

fn world_centroid(model: &CoffeeMachine, range: DrawRange, world: &Matrix4<f32>) -> Vector3<f32> {
    let positions: Vec<[f32; 3]> = model.geometry.positions
        [range.start as usize..range.end() as usize]
        .iter()
        .map(|p| transform_point(world, *p).into())
        .collect();
    centroid(&positions)
}

#[test]
fn hierarchy_is_stand_machine_then_coffee_and_cup() {
    let (_, graph, nodes) = setup(&level_snapshot());

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.node(nodes.stand).parent(), None);
    assert_eq!(graph.node(nodes.machine).parent(), Some(nodes.stand));
    assert_eq!(graph.node(nodes.coffee).parent(), Some(nodes.machine));
    assert_eq!(graph.node(nodes.cup).parent(), Some(nodes.machine));
    assert_eq!(graph.find("cup"), Some(nodes.cup));
    assert_eq!(graph.find("saucer"), None);
}

#[test]
fn identity_controls_leave_the_model_where_it_was_built() {
    let (model, graph, nodes) = setup(&level_snapshot());
    let worlds = graph.world_transforms();

    for id in [nodes.stand, nodes.machine, nodes.cup] {
        assert_mat4_near(&worlds[id.index()], &Matrix4::identity());
    }
    let stand = world_centroid(&model, model.stand, &worlds[nodes.stand.index()]);
    assert_vec3_near(stand, Vector3::new(0.0, -0.8, 0.0));
}

#[test]
fn machine_body_rests_on_the_stand() {
    let (model, graph, nodes) = setup(&level_snapshot());
    let world = graph.world_transforms()[nodes.machine.index()];

    let start = model.machine.start as usize;
    let body: Vec<[f32; 3]> = model.geometry.positions[start..start + VERTICES_PER_BOX as usize]
        .iter()
        .map(|p| transform_point(&world, *p).into())
        .collect();
    assert_near(min_y(&body), -0.2);

    let stand = model.stand.start as usize..model.stand.end() as usize;
    let stand_top = model.geometry.positions[stand]
        .iter()
        .map(|p| p[1])
        .fold(f32::NEG_INFINITY, f32::max);
    assert_near(stand_top, -0.2);
}

#[test]
fn root_transform_moves_every_node() {
    let snapshot = InputSnapshot {
        root: Transform::from_translation(0.0, 1.0, 0.0),
        ..level_snapshot()
    };
    let (model, graph, nodes) = setup(&snapshot);
    let worlds = graph.world_transforms();

    let stand = world_centroid(&model, model.stand, &worlds[nodes.stand.index()]);
    assert_vec3_near(stand, Vector3::new(0.0, 0.2, 0.0));
    for id in [nodes.stand, nodes.machine, nodes.cup] {
        assert_mat4_near(&worlds[id.index()], &math::translate(0.0, 1.0, 0.0));
    }
}

#[test]
fn stand_offset_drags_the_machine_and_its_children() {
    let snapshot = InputSnapshot {
        stand_offset: Vector3::new(0.5, 0.0, -0.25),
        ..level_snapshot()
    };
    let (_, graph, nodes) = setup(&snapshot);
    let worlds = graph.world_transforms();

    let moved = math::translate(0.5, 0.0, -0.25);
    assert_mat4_near(&worlds[nodes.stand.index()], &moved);
    assert_mat4_near(&worlds[nodes.machine.index()], &moved);
    assert_mat4_near(&worlds[nodes.cup.index()], &moved);
}

#[test]
fn machine_offset_leaves_the_stand_in_place() {
    let snapshot = InputSnapshot {
        machine_offset: Vector3::new(0.3, 0.1, 0.0),
        ..level_snapshot()
    };
    let (_, graph, nodes) = setup(&snapshot);
    let worlds = graph.world_transforms();

    let moved = math::translate(0.3, 0.1, 0.0);
    assert_mat4_near(&worlds[nodes.stand.index()], &Matrix4::identity());
    assert_mat4_near(&worlds[nodes.machine.index()], &moved);
    assert_mat4_near(&worlds[nodes.cup.index()], &moved);
}

#[test]
fn cup_offset_is_relative_to_the_machine() {
    let snapshot = InputSnapshot {
        machine_offset: Vector3::new(0.3, 0.0, 0.0),
        cup_offset: Vector3::new(0.0, -0.2, 0.1),
        ..level_snapshot()
    };
    let (_, graph, nodes) = setup(&snapshot);
    let worlds = graph.world_transforms();

    assert_mat4_near(
        &worlds[nodes.cup.index()],
        &math::translate(0.3, -0.2, 0.1),
    );
}

#[test]
fn coffee_sinks_with_the_animation_clock() {
    let snapshot = InputSnapshot {
        coffee_time: 0.05,
        ..level_snapshot()
    };
    let (_, graph, nodes) = setup(&snapshot);
    let worlds = graph.world_transforms();
    assert_mat4_near(
        &worlds[nodes.coffee.index()],
        &math::translate(0.0, -0.05, 0.0),
    );

    // one full fall later the stream starts over at the same height
    let snapshot = InputSnapshot {
        coffee_time: 0.05 + FALL as f64,
        ..level_snapshot()
    };
    let (_, graph, nodes) = setup(&snapshot);
    assert_mat4_near(
        &graph.world_transforms()[nodes.coffee.index()],
        &math::translate(0.0, -0.05, 0.0),
    );
}

#[test]
fn evaluate_combines_view_and_world_per_node() {
    let snapshot = InputSnapshot {
        stand_offset: Vector3::new(0.0, 0.0, 1.0),
        ..InputSnapshot::default()
    };
    let (_, graph, _) = setup(&snapshot);
    let view = math::look_at(
        cgmath::Point3::new(0.0, 2.0, 5.0),
        cgmath::Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    );

    let evaluated = graph.evaluate(&view);
    let worlds = graph.world_transforms();
    assert_eq!(evaluated.len(), 4);
    for (node, world) in evaluated.iter().zip(worlds) {
        assert_mat4_near(&node.world, &world);
        assert_mat4_near(&node.model_view, &(view * world));
        assert_mat3_near(&node.normal, &math::normal_matrix(&(view * world), true));
    }
    let names: Vec<_> = evaluated.iter().map(|n| n.name).collect();
    assert_eq!(names, ["stand", "machine", "coffee", "cup"]);
}

#[test]
fn evaluating_twice_gives_the_same_result() {
    let (_, graph, _) = setup(&InputSnapshot::default());
    let view = math::identity();
    let first = graph.evaluate(&view);
    let second = graph.evaluate(&view);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.model_view, b.model_view);
    }
}

#[test]
fn nodes_need_an_existing_parent() {
    let (_, _, nodes) = setup(&level_snapshot());
    let mut graph = SceneGraph::new();

    let result = graph.add_node("orphan", DrawRange::default(), Some(nodes.cup));
    assert!(result.is_err());
    assert!(graph.is_empty());

    let root = graph
        .add_node("root", DrawRange::default(), None)
        .expect("root node");
    graph
        .add_node("child", DrawRange::default(), Some(root))
        .expect("child node");
    assert_eq!(graph.len(), 2);
}

#[test]
fn local_transforms_can_be_read_back() {
    let (_, mut graph, nodes) = setup(&level_snapshot());
    let local = Transform::from_translation(1.0, 2.0, 3.0);
    graph.set_local_transform(nodes.machine, local);
    assert_eq!(graph.get_local_transform(nodes.machine), Some(local));
}
