//! Card scene graph.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A node owns its
//! children: removing a node removes its whole subtree. Every node keeps a
//! typed link to its parent so lookups that need the owning chain (picking
//! metadata, world transforms) are plain loops.

use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

mod geometry;
mod material;

pub use geometry::{Geometry, MeshData, Topology};
pub use material::{Material, MaterialKind, Side, TextureSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Local transform. Rotation is an XYZ Euler triple in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Profile,
    Contact,
    QrCode,
    Logo,
    Social,
    Decoration,
}

/// What a pick resolves to. Lives on the node that represents the whole
/// interactive element; child quads carry none and resolve through their
/// owners.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMetadata {
    pub kind: InteractionKind,
    pub tooltip: String,
    pub payload: FnvHashMap<String, String>,
}

impl InteractionMetadata {
    pub fn new(kind: InteractionKind, tooltip: impl Into<String>) -> Self {
        Self {
            kind,
            tooltip: tooltip.into(),
            payload: FnvHashMap::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.payload.get(key).map(String::as_str)
    }
}

/// Idle motion of a floating decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatMotion {
    pub float_offset: f32,
    pub rotation_speed: f32,
}

/// Geometry tessellated once at build time, plus how to draw it.
#[derive(Clone, Debug)]
pub struct Visual {
    pub geometry: Geometry,
    pub mesh: MeshData,
    pub material: Material,
}

impl Visual {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        let mesh = geometry.tessellate();
        Self {
            geometry,
            mesh,
            material,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
    pub visual: Option<Visual>,
    pub metadata: Option<InteractionMetadata>,
    pub motion: Option<FloatMotion>,
}

impl Node {
    pub fn group(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            visible: true,
            parent: None,
            children: SmallVec::new(),
            visual: None,
            metadata: None,
            motion: None,
        }
    }

    pub fn mesh(name: impl Into<String>, transform: Transform, visual: Visual) -> Self {
        Self {
            visual: Some(visual),
            ..Self::group(name, transform)
        }
    }

    pub fn with_metadata(mut self, metadata: InteractionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_motion(mut self, motion: FloatMotion) -> Self {
        self.motion = Some(motion);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Light shining from `position` towards the origin.
    Directional,
    Point { range: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    roots: Vec<NodeId>,
    pub background: Option<Vec3>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.insert(node);
        match self.get_mut(parent) {
            Some(p) => p.children.push(id),
            None => {
                log::warn!("[scene] parent {:?} missing; attaching {:?} at root", parent, id);
                if let Some(n) = self.get_mut(id) {
                    n.parent = None;
                }
                self.roots.push(id);
            }
        }
        id
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Destroy `id` and all of its descendants.
    pub fn remove(&mut self, id: NodeId) {
        let parent = match self.get(id) {
            Some(n) => n.parent,
            None => return,
        };
        match parent.and_then(|p| self.get_mut(p)) {
            Some(p) => p.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transform of `id`; identity when the node no longer exists.
    pub fn transform(&self, id: NodeId) -> Transform {
        self.get(id).map(|n| n.transform).unwrap_or_default()
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|n| &mut n.transform)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.get_mut(id) {
            n.visible = visible;
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).map(|n| n.visible).unwrap_or(false)
    }

    /// Visible only if the node and every owner up the chain is visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        self.ancestry(id).all(|n| self.is_visible(n))
    }

    /// `id` followed by its owners up to the root.
    pub fn ancestry(&self, id: NodeId) -> Ancestry<'_> {
        Ancestry {
            scene: self,
            next: self.get(id).map(|_| id),
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        self.ancestry(id)
            .fold(Mat4::IDENTITY, |acc, n| self.transform(n).matrix() * acc)
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Depth-first, parents before children.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(n) = self.get(cur) {
                out.push(cur);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every live node, depth-first from each root in insertion order.
    pub fn walk(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|r| self.descendants(*r))
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|id| self.get(*id).map(|n| n.name == name).unwrap_or(false))
    }
}

pub struct Ancestry<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestry<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.scene.get(cur).and_then(|n| n.parent);
        Some(cur)
    }
}
