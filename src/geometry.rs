//! Procedural primitive builders. All shapes are centred on the origin.

use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::scene::{Geometry, Topology};

pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let h = Vec3::new(width, height, depth) * 0.5;
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push((n + u * su + v * sv) * h);
            normals.push(n);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    Geometry::new(Topology::Triangles, positions, normals, indices)
}

pub fn plane(width: f32, height: f32) -> Geometry {
    let (w, h) = (width * 0.5, height * 0.5);
    let positions = vec![
        Vec3::new(-w, -h, 0.0),
        Vec3::new(w, -h, 0.0),
        Vec3::new(w, h, 0.0),
        Vec3::new(-w, h, 0.0),
    ];
    Geometry::new(Topology::Triangles, positions, vec![Vec3::Z; 4], vec![0, 1, 2, 0, 2, 3])
}

pub fn sphere(radius: f32, segments: u32, rings: u32) -> Geometry {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            positions.push(n * radius);
            normals.push(n);
        }
    }
    let stride = segments + 1;
    let mut indices = Vec::new();
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Geometry::new(Topology::Triangles, positions, normals, indices)
}

pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> Geometry {
    let radial = radial.max(3);
    let tubular = tubular.max(3);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for j in 0..=radial {
        let v = TAU * j as f32 / radial as f32;
        for i in 0..=tubular {
            let u = TAU * i as f32 / tubular as f32;
            let centre = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            positions.push(p);
            normals.push((p - centre).normalize_or_zero());
        }
    }
    let stride = tubular + 1;
    let mut indices = Vec::new();
    for j in 0..radial {
        for i in 0..tubular {
            let a = j * stride + i;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Geometry::new(Topology::Triangles, positions, normals, indices)
}

/// Capped cylinder along Y.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Geometry {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    for s in 0..=segments {
        let theta = TAU * s as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        let n = Vec3::new(cos, slope, sin).normalize_or_zero();
        positions.push(Vec3::new(radius_top * cos, half, radius_top * sin));
        normals.push(n);
        positions.push(Vec3::new(radius_bottom * cos, -half, radius_bottom * sin));
        normals.push(n);
    }
    for s in 0..segments {
        let a = s * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }
    for (y, r, n) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        let centre = positions.len() as u32;
        positions.push(Vec3::new(0.0, y, 0.0));
        normals.push(n);
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            positions.push(Vec3::new(r * theta.cos(), y, r * theta.sin()));
            normals.push(n);
        }
        for s in 0..segments {
            indices.extend_from_slice(&[centre, centre + 1 + s, centre + 2 + s]);
        }
    }
    Geometry::new(Topology::Triangles, positions, normals, indices)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polyhedron {
    Octahedron,
    Icosahedron,
}

impl Polyhedron {
    pub fn vertices(self, radius: f32) -> Vec<Vec3> {
        let raw: Vec<Vec3> = match self {
            Polyhedron::Octahedron => vec![Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z],
            Polyhedron::Icosahedron => {
                let t = (1.0 + 5f32.sqrt()) / 2.0;
                vec![
                    Vec3::new(-1.0, t, 0.0),
                    Vec3::new(1.0, t, 0.0),
                    Vec3::new(-1.0, -t, 0.0),
                    Vec3::new(1.0, -t, 0.0),
                    Vec3::new(0.0, -1.0, t),
                    Vec3::new(0.0, 1.0, t),
                    Vec3::new(0.0, -1.0, -t),
                    Vec3::new(0.0, 1.0, -t),
                    Vec3::new(t, 0.0, -1.0),
                    Vec3::new(t, 0.0, 1.0),
                    Vec3::new(-t, 0.0, -1.0),
                    Vec3::new(-t, 0.0, 1.0),
                ]
            }
        };
        raw.into_iter().map(|v| v.normalize() * radius).collect()
    }

    /// Unique edges as vertex index pairs: every pair at the minimum vertex distance.
    pub fn edges(self) -> Vec<(usize, usize)> {
        let verts = self.vertices(1.0);
        let mut shortest = f32::MAX;
        for i in 0..verts.len() {
            for j in i + 1..verts.len() {
                shortest = shortest.min(verts[i].distance(verts[j]));
            }
        }
        let mut edges = BTreeSet::new();
        for i in 0..verts.len() {
            for j in i + 1..verts.len() {
                if verts[i].distance(verts[j]) < shortest * 1.01 {
                    edges.insert((i, j));
                }
            }
        }
        edges.into_iter().collect()
    }
}

pub fn wire_polyhedron(shape: Polyhedron, radius: f32) -> Geometry {
    let verts = shape.vertices(radius);
    let pairs: Vec<(Vec3, Vec3)> = shape.edges().into_iter().map(|(a, b)| (verts[a], verts[b])).collect();
    segments(&pairs)
}

pub fn segments(pairs: &[(Vec3, Vec3)]) -> Geometry {
    let positions = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    Geometry::new(Topology::Lines, positions, Vec::new(), Vec::new())
}

/// Open polyline drawn as consecutive segments.
pub fn polyline(points: &[Vec3]) -> Geometry {
    let pairs: Vec<(Vec3, Vec3)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    segments(&pairs)
}

/// Closed circle in the XY plane.
pub fn ring(radius: f32, count: u32) -> Geometry {
    let count = count.max(3);
    let points: Vec<Vec3> = (0..=count)
        .map(|i| {
            let a = TAU * i as f32 / count as f32;
            Vec3::new(radius * a.cos(), radius * a.sin(), 0.0)
        })
        .collect();
    polyline(&points)
}

/// Latitude and longitude circles of a sphere.
pub fn wire_globe(radius: f32, meridians: u32, parallels: u32) -> Geometry {
    let steps = 32;
    let mut pairs = Vec::new();
    for m in 0..meridians {
        let theta = PI * m as f32 / meridians as f32;
        for i in 0..steps {
            let p = |k: u32| {
                let phi = TAU * k as f32 / steps as f32;
                Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()) * radius
            };
            pairs.push((p(i), p(i + 1)));
        }
    }
    for p in 1..parallels {
        let phi = PI * p as f32 / parallels as f32;
        let (y, r) = (phi.cos() * radius, phi.sin() * radius);
        for i in 0..steps {
            let q = |k: u32| {
                let theta = TAU * k as f32 / steps as f32;
                Vec3::new(r * theta.cos(), y, r * theta.sin())
            };
            pairs.push((q(i), q(i + 1)));
        }
    }
    segments(&pairs)
}

pub fn box_edges(width: f32, height: f32, depth: f32) -> Geometry {
    let h = Vec3::new(width, height, depth) * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * h;
    let mut pairs = Vec::with_capacity(12);
    for &s in &[-1.0, 1.0] {
        for &t in &[-1.0, 1.0] {
            pairs.push((corner(-1.0, s, t), corner(1.0, s, t)));
            pairs.push((corner(s, -1.0, t), corner(s, 1.0, t)));
            pairs.push((corner(s, t, -1.0), corner(s, t, 1.0)));
        }
    }
    segments(&pairs)
}

pub fn points(positions: Vec<Vec3>) -> Geometry {
    Geometry::new(Topology::Points, positions, Vec::new(), Vec::new())
}

/// Point on a quadratic Bézier curve.
pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}
