//! Scene graph and per-frame transform evaluation.
//!
//! The graph is a flat array of [`SceneNode`] records that reference their parent
//! by index. A node is only accepted after its parent, so walking the array front
//! to back visits every parent before its children and one pass is enough to
//! compose all world transforms.
//!
//! World matrices are never cached. The local parameters change with every input
//! event, so [`SceneGraph::evaluate`] recomputes the whole chain from the current
//! parameters each time it is called.

use anyhow::ensure;
use cgmath::{Matrix3, Matrix4};

use crate::{
    animation::drop_offset,
    data_structures::{geometry::DrawRange, machine::CoffeeMachine, transform::Transform},
    input::InputSnapshot,
    math,
};

/// Index of a node inside its [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: &'static str,
    pub local: Transform,
    pub range: DrawRange,
    parent: Option<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Everything the renderer needs to draw one node.
#[derive(Clone, Copy, Debug)]
pub struct NodeTransforms {
    pub id: NodeId,
    pub name: &'static str,
    pub range: DrawRange,
    pub world: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub normal: Matrix3<f32>,
}

/// A scene root transform plus a fixed set of drawable nodes.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    root: Transform,
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Appends a node. Without a parent the node hangs directly off the scene root.
     *
     * The parent has to exist already, which keeps the array topologically
     * ordered.
     */
    pub fn add_node(
        &mut self,
        name: &'static str,
        range: DrawRange,
        parent: Option<NodeId>,
    ) -> anyhow::Result<NodeId> {
        if let Some(parent) = parent {
            ensure!(
                parent.0 < self.nodes.len(),
                "parent {:?} of node '{}' does not exist yet (graph has {} nodes)",
                parent,
                name,
                self.nodes.len()
            );
        }
        self.nodes.push(SceneNode {
            name,
            local: Transform::default(),
            range,
            parent,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    pub fn root_transform(&self) -> &Transform {
        &self.root
    }

    pub fn set_root_transform(&mut self, root: Transform) {
        self.root = root;
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id.0).map(|node| node.local)
    }

    pub fn set_local_transform(&mut self, id: NodeId, local: Transform) {
        match self.nodes.get_mut(id.0) {
            Some(node) => node.local = local,
            None => log::warn!(
                "You tried to transform node {:?}, but there are only {} nodes.",
                id,
                self.nodes.len()
            ),
        }
    }

    /// World matrices of all nodes, indexed like the nodes themselves.
    pub fn world_transforms(&self) -> Vec<Matrix4<f32>> {
        let root = self.root.to_matrix();
        let mut worlds: Vec<Matrix4<f32>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent = match node.parent {
                Some(parent) => worlds[parent.0],
                None => root,
            };
            worlds.push(parent * node.local.to_matrix());
        }
        worlds
    }

    /// Model-view and normal matrices of every node for the given view matrix,
    /// in node order.
    pub fn evaluate(&self, view: &Matrix4<f32>) -> Vec<NodeTransforms> {
        self.world_transforms()
            .into_iter()
            .zip(self.nodes.iter())
            .enumerate()
            .map(|(idx, (world, node))| {
                let model_view = view * world;
                NodeTransforms {
                    id: NodeId(idx),
                    name: node.name,
                    range: node.range,
                    world,
                    model_view,
                    normal: math::normal_matrix(&model_view, true),
                }
            })
            .collect()
    }
}

/// Handles to the four nodes of the coffee-machine scene.
#[derive(Clone, Copy, Debug)]
pub struct CoffeeNodes {
    pub stand: NodeId,
    pub machine: NodeId,
    pub coffee: NodeId,
    pub cup: NodeId,
}

impl CoffeeNodes {
    /**
     * Copies the snapshot's parameters into the graph.
     *
     * The coffee stream has no user offset; its local transform is the sawtooth
     * drop driven by the animation clock.
     */
    pub fn apply(&self, graph: &mut SceneGraph, snapshot: &InputSnapshot, fall_distance: f32) {
        graph.set_root_transform(snapshot.root);
        graph.set_local_transform(self.stand, snapshot.stand_offset.into());
        graph.set_local_transform(self.machine, snapshot.machine_offset.into());
        graph.set_local_transform(
            self.coffee,
            Transform::from_translation(0.0, drop_offset(snapshot.coffee_time, fall_distance), 0.0),
        );
        graph.set_local_transform(self.cup, snapshot.cup_offset.into());
    }
}

/**
 * Builds the fixed hierarchy of the coffee-machine scene.
 *
 * The machine is chained off the stand's world transform, not off the root,
 * even though the two sit side by side in model space. Moving the stand
 * therefore drags the machine (and with it coffee and cup) along, while moving
 * the machine leaves the stand in place.
 */
pub fn mk_coffee_scene_graph(model: &CoffeeMachine) -> anyhow::Result<(SceneGraph, CoffeeNodes)> {
    let mut graph = SceneGraph::new();
    let stand = graph.add_node("stand", model.stand, None)?;
    let machine = graph.add_node("machine", model.machine, Some(stand))?;
    let coffee = graph.add_node("coffee", model.coffee, Some(machine))?;
    let cup = graph.add_node("cup", model.cup, Some(machine))?;
    Ok((
        graph,
        CoffeeNodes {
            stand,
            machine,
            coffee,
            cup,
        },
    ))
}
