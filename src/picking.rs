//! Pointer hit-testing against the registered interactive elements.

use crate::camera::{ray_triangle, Camera, Ray};
use crate::scene::{InteractionMetadata, NodeId, Scene, Side};
use glam::Vec2;

/// Roots eligible for hit-testing, in registration order. Filled while the
/// card is built and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct InteractiveRegistry {
    roots: Vec<NodeId>,
}

impl InteractiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// Closest intersection between `ray` and any visible, pickable mesh under
/// the registered roots.
pub fn raycast(scene: &Scene, registry: &InteractiveRegistry, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for root in registry.roots() {
        if !scene.is_effectively_visible(*root) {
            continue;
        }
        for id in scene.descendants(*root) {
            let Some(node) = scene.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let Some(visual) = &node.visual else {
                continue;
            };
            if !visual.geometry.is_pickable() {
                continue;
            }
            let world = scene.world_matrix(id);
            let local = ray.transformed(&world.inverse());
            let cull_back = visual.material.side == Side::Front;
            let hit_t = visual
                .mesh
                .triangles()
                .filter_map(|tri| ray_triangle(&local, &tri, cull_back))
                .fold(None::<f32>, |acc, t| Some(acc.map_or(t, |a| a.min(t))));
            if let Some(t) = hit_t {
                let distance = world
                    .transform_point3(local.at(t))
                    .distance(ray.origin);
                match best {
                    Some(b) if distance >= b.distance => {}
                    _ => best = Some(Hit { node: id, distance }),
                }
            }
        }
    }
    best
}

/// Nearest metadata on `node` or its owners.
pub fn resolve_metadata(scene: &Scene, node: NodeId) -> Option<(NodeId, &InteractionMetadata)> {
    scene
        .ancestry(node)
        .find_map(|id| scene.get(id)?.metadata.as_ref().map(|m| (id, m)))
}

/// Pointer position (normalized device coordinates) to the metadata of the
/// element under it. `None` is a miss.
pub fn pick<'s>(
    scene: &'s Scene,
    registry: &InteractiveRegistry,
    camera: &Camera,
    ndc: Vec2,
) -> Option<&'s InteractionMetadata> {
    let ray = camera.ray_from_ndc(ndc);
    let hit = raycast(scene, registry, &ray)?;
    resolve_metadata(scene, hit.node).map(|(_, m)| m)
}

/// Client pixel position to normalized device coordinates for a viewport of
/// `width` x `height` pixels.
#[inline]
pub fn client_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (x / width.max(1.0)) * 2.0 - 1.0,
        -(y / height.max(1.0)) * 2.0 + 1.0,
    )
}
