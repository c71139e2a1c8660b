use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    /// Authoring-time normal. Shading works from live face geometry, not from this.
    pub normal: Vec3,
}

/// Indexed triangle list. Every index triple is wound counter-clockwise
/// when seen from outside, so `cross(v2 - v1, v3 - v1)` points outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<[usize; 3]>,
}

const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

#[rustfmt::skip]
const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [4, 5, 6], [4, 6, 7], // +z
    [1, 0, 3], [1, 3, 2], // -z
    [5, 1, 2], [5, 2, 6], // +x
    [0, 4, 7], [0, 7, 3], // -x
    [7, 6, 2], [7, 2, 3], // +y
    [0, 1, 5], [0, 5, 4], // -y
];

impl Mesh {
    /// Cube with corners at unit distance along each axis (`±1`).
    pub fn unit_cube() -> Self {
        let vertices = CUBE_CORNERS
            .iter()
            .map(|&position| Vertex {
                position,
                normal: position.normalize(),
            })
            .collect();

        Self {
            vertices,
            indices: CUBE_TRIANGLES.to_vec(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.indices[index];
        [
            self.vertices[a].position,
            self.vertices[b].position,
            self.vertices[c].position,
        ]
    }
}

pub fn face_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    (v2 - v1).cross(v3 - v1).normalize()
}
