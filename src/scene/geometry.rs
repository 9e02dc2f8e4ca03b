use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

/// Shape descriptions used by the card builder. UVs follow texture space:
/// `v = 0` is the top edge.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
    Circle { radius: f32, segments: u32 },
    Ring { inner: f32, outer: f32, segments: u32 },
    BoxEdges { width: f32, height: f32, depth: f32 },
    PlaneEdges { width: f32, height: f32 },
    Tetrahedron { radius: f32 },
    Octahedron { radius: f32 },
    Icosahedron { radius: f32 },
    Torus { radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32 },
    /// Small camera-plane quads, one per sample, with per-sample colour.
    Points { positions: Vec<Vec3>, colors: Vec<Vec3>, size: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Empty unless the geometry carries vertex colours.
    pub colors: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Triangles
    }
}

impl MeshData {
    fn new(topology: Topology) -> Self {
        Self {
            topology,
            ..Self::default()
        }
    }

    fn push(&mut self, p: Vec3, n: Vec3, uv: Vec2) -> u32 {
        let i = self.positions.len() as u32;
        self.positions.push(p);
        self.normals.push(n);
        self.uvs.push(uv);
        i
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Triangle corners in local space.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let tris = match self.topology {
            Topology::Triangles => self.indices.chunks_exact(3),
            Topology::Lines => self.indices[..0].chunks_exact(3),
        };
        tris.map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }
}

impl Geometry {
    /// Whether a ray can hit this shape. Lines and point sprites are
    /// visual-only.
    pub fn is_pickable(&self) -> bool {
        !matches!(
            self,
            Geometry::BoxEdges { .. } | Geometry::PlaneEdges { .. } | Geometry::Points { .. }
        )
    }

    pub fn tessellate(&self) -> MeshData {
        match self {
            Geometry::Box {
                width,
                height,
                depth,
            } => box_mesh(*width, *height, *depth),
            Geometry::Plane { width, height } => plane_mesh(*width, *height),
            Geometry::Circle { radius, segments } => ring_mesh(0.0, *radius, *segments),
            Geometry::Ring {
                inner,
                outer,
                segments,
            } => ring_mesh(*inner, *outer, *segments),
            Geometry::BoxEdges {
                width,
                height,
                depth,
            } => box_edges(*width, *height, *depth),
            Geometry::PlaneEdges { width, height } => plane_edges(*width, *height),
            Geometry::Tetrahedron { radius } => polyhedron(&TETRA_VERTS, &TETRA_FACES, *radius),
            Geometry::Octahedron { radius } => polyhedron(&OCTA_VERTS, &OCTA_FACES, *radius),
            Geometry::Icosahedron { radius } => {
                let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
                let verts = ico_verts(t);
                polyhedron(&verts, &ICO_FACES, *radius)
            }
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus_mesh(*radius, *tube, *radial_segments, *tubular_segments),
            Geometry::Points {
                positions,
                colors,
                size,
            } => point_quads(positions, colors, *size),
        }
    }
}

fn plane_mesh(width: f32, height: f32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let (hw, hh) = (width / 2.0, height / 2.0);
    let n = Vec3::Z;
    let a = m.push(Vec3::new(-hw, hh, 0.0), n, Vec2::new(0.0, 0.0));
    let b = m.push(Vec3::new(hw, hh, 0.0), n, Vec2::new(1.0, 0.0));
    let c = m.push(Vec3::new(hw, -hh, 0.0), n, Vec2::new(1.0, 1.0));
    let d = m.push(Vec3::new(-hw, -hh, 0.0), n, Vec2::new(0.0, 1.0));
    m.indices.extend_from_slice(&[a, d, c, a, c, b]);
    m
}

fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let h = Vec3::new(width, height, depth) / 2.0;
    // (normal, u axis, v axis) per face; v axis points down the texture
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::NEG_Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::NEG_Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::Z, Vec3::X, Vec3::NEG_Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::NEG_Y),
    ];
    for (n, u, v) in faces {
        let center = n * h;
        let du = u * h;
        let dv = v * h;
        let a = m.push(center - du - dv, n, Vec2::new(0.0, 0.0));
        let b = m.push(center + du - dv, n, Vec2::new(1.0, 0.0));
        let c = m.push(center + du + dv, n, Vec2::new(1.0, 1.0));
        let d = m.push(center - du + dv, n, Vec2::new(0.0, 1.0));
        m.indices.extend_from_slice(&[a, d, c, a, c, b]);
    }
    m
}

/// Flat disc (`inner == 0`) or annulus in the XY plane facing +Z.
fn ring_mesh(inner: f32, outer: f32, segments: u32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let segments = segments.max(3);
    let uv = |p: Vec3| Vec2::new(p.x / outer * 0.5 + 0.5, 0.5 - p.y / outer * 0.5);
    if inner <= 0.0 {
        let c = m.push(Vec3::ZERO, Vec3::Z, Vec2::splat(0.5));
        for i in 0..=segments {
            let a = i as f32 / segments as f32 * TAU;
            let p = Vec3::new(a.cos() * outer, a.sin() * outer, 0.0);
            m.push(p, Vec3::Z, uv(p));
        }
        for i in 1..=segments {
            m.indices.extend_from_slice(&[c, c + i, c + i + 1]);
        }
        return m;
    }
    for i in 0..=segments {
        let a = i as f32 / segments as f32 * TAU;
        let dir = Vec3::new(a.cos(), a.sin(), 0.0);
        m.push(dir * inner, Vec3::Z, uv(dir * inner));
        m.push(dir * outer, Vec3::Z, uv(dir * outer));
    }
    for i in 0..segments {
        let (i0, o0, i1, o1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        m.indices.extend_from_slice(&[i0, o0, o1, i0, o1, i1]);
    }
    m
}

fn lines(corners: &[Vec3], pairs: &[(usize, usize)]) -> MeshData {
    let mut m = MeshData::new(Topology::Lines);
    for p in corners {
        m.push(*p, Vec3::Z, Vec2::ZERO);
    }
    for (a, b) in pairs {
        m.indices.extend_from_slice(&[*a as u32, *b as u32]);
    }
    m
}

fn box_edges(width: f32, height: f32, depth: f32) -> MeshData {
    let h = Vec3::new(width, height, depth) / 2.0;
    let corners: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
        .collect();
    let pairs = [
        (0, 1), (2, 3), (4, 5), (6, 7), // along x
        (0, 2), (1, 3), (4, 6), (5, 7), // along y
        (0, 4), (1, 5), (2, 6), (3, 7), // along z
    ];
    lines(&corners, &pairs)
}

fn plane_edges(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corners = [
        Vec3::new(-hw, hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(-hw, -hh, 0.0),
    ];
    lines(&corners, &[(0, 1), (1, 2), (2, 3), (3, 0)])
}

const TETRA_VERTS: [[f32; 3]; 4] = [[1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0]];
const TETRA_FACES: [[u32; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

const OCTA_VERTS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];
const OCTA_FACES: [[u32; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

fn ico_verts(t: f32) -> [[f32; 3]; 12] {
    [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
}

const ICO_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Flat-shaded polyhedron: vertices are projected onto a sphere of `radius`
/// and every face gets its own three vertices.
fn polyhedron(verts: &[[f32; 3]], faces: &[[u32; 3]], radius: f32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let on_sphere = |i: u32| Vec3::from_array(verts[i as usize]).normalize() * radius;
    for f in faces {
        let (a, mut b, mut c) = (on_sphere(f[0]), on_sphere(f[1]), on_sphere(f[2]));
        if (b - a).cross(c - a).dot(a + b + c) < 0.0 {
            std::mem::swap(&mut b, &mut c);
        }
        let n = (b - a).cross(c - a).normalize_or_zero();
        for p in [a, b, c] {
            let i = m.push(p, n, spherical_uv(p));
            m.indices.push(i);
        }
    }
    m
}

fn spherical_uv(p: Vec3) -> Vec2 {
    let d = p.normalize_or_zero();
    Vec2::new(d.z.atan2(-d.x) / TAU + 0.5, 0.5 - d.y.clamp(-1.0, 1.0).asin() / PI)
}

fn torus_mesh(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let (radial, tubular) = (radial.max(3), tubular.max(3));
    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let v = j as f32 / radial as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let uv = Vec2::new(i as f32 / tubular as f32, 1.0 - j as f32 / radial as f32);
            m.push(p, (p - center).normalize_or_zero(), uv);
        }
    }
    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            m.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    m
}

fn point_quads(positions: &[Vec3], colors: &[Vec3], size: f32) -> MeshData {
    let mut m = MeshData::new(Topology::Triangles);
    let h = size / 2.0;
    for (k, p) in positions.iter().enumerate() {
        let color = colors.get(k).copied().unwrap_or(Vec3::ONE);
        let a = m.push(*p + Vec3::new(-h, h, 0.0), Vec3::Z, Vec2::new(0.0, 0.0));
        let b = m.push(*p + Vec3::new(h, h, 0.0), Vec3::Z, Vec2::new(1.0, 0.0));
        let c = m.push(*p + Vec3::new(h, -h, 0.0), Vec3::Z, Vec2::new(1.0, 1.0));
        let d = m.push(*p + Vec3::new(-h, -h, 0.0), Vec3::Z, Vec2::new(0.0, 1.0));
        m.colors.extend_from_slice(&[color; 4]);
        m.indices.extend_from_slice(&[a, d, c, a, c, b]);
    }
    m
}
