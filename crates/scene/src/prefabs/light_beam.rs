//! Light-beam prefab: a truncated pyramid that fades from an opaque base to a
//! transparent top.

use serde::{Deserialize, Serialize};

use crate::components::{BasicMaterial, Geometry, Side, Transform};
use crate::mesh::Mesh;

/// Beam size in meters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamDimensions {
    pub height_m: f32,
    /// Full width of the base square.
    pub bottom_m: f32,
    /// Full width of the top square.
    pub top_m: f32,
}

impl Default for BeamDimensions {
    fn default() -> Self {
        Self {
            height_m: 10.0,
            bottom_m: 0.5,
            top_m: 4.0,
        }
    }
}

// Four side quads, then base and top caps.
const BEAM_INDICES: [u16; 36] = [
    0, 1, 5, 0, 5, 4, //
    1, 2, 6, 1, 6, 5, //
    2, 3, 7, 2, 7, 6, //
    3, 0, 4, 3, 4, 7, //
    0, 2, 1, 0, 3, 2, //
    4, 5, 6, 4, 6, 7,
];

pub fn light_beam_geometry(dims: BeamDimensions) -> Geometry {
    let h = dims.height_m;
    let b = dims.bottom_m / 2.0;
    let t = dims.top_m / 2.0;

    let positions = vec![
        // base
        [-b, -b, 0.0],
        [b, -b, 0.0],
        [b, b, 0.0],
        [-b, b, 0.0],
        // top
        [-t, -t, h],
        [t, -t, h],
        [t, t, h],
        [-t, t, h],
    ];

    let mut colors = vec![[1.0, 1.0, 1.0, 1.0]; 4];
    colors.extend([[1.0, 1.0, 1.0, 0.0]; 4]);

    Geometry::new(positions, BEAM_INDICES.to_vec()).with_colors(colors)
}

pub fn light_beam_material() -> BasicMaterial {
    BasicMaterial {
        vertex_colors: true,
        transparent: true,
        depth_write: false,
        side: Side::Double,
        ..BasicMaterial::default()
    }
}

/// Beam mesh with its local transform. The geometry is built Z-up; `transform`
/// usually stands it up along +Y.
pub fn light_beam(dims: BeamDimensions, transform: Transform) -> Mesh {
    Mesh::new(light_beam_geometry(dims), light_beam_material()).with_transform(transform)
}

#[cfg(test)]
mod tests {
    use super::{BeamDimensions, light_beam, light_beam_geometry};
    use crate::components::{Side, Transform};

    #[test]
    fn frustum_has_eight_vertices_and_twelve_triangles() {
        let g = light_beam_geometry(BeamDimensions::default());
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.indices.len(), 36);
        assert_eq!(g.triangle_count(), 12);
        assert_eq!(g.validate(), Ok(()));
    }

    #[test]
    fn alpha_fades_from_base_to_top() {
        let g = light_beam_geometry(BeamDimensions::default());
        let colors = g.colors.as_ref().expect("beam has vertex colors");
        for (pos, color) in g.positions.iter().zip(colors) {
            if pos[2] == 0.0 {
                assert_eq!(color[3], 1.0);
            } else {
                assert_eq!(color[3], 0.0);
            }
        }
        assert_eq!(colors.iter().filter(|c| c[3] == 1.0).count(), 4);
        assert_eq!(colors.iter().filter(|c| c[3] == 0.0).count(), 4);
    }

    #[test]
    fn top_is_wider_than_base() {
        let g = light_beam_geometry(BeamDimensions::default());
        assert_eq!(g.positions[1], [0.25, -0.25, 0.0]);
        assert_eq!(g.positions[6], [2.0, 2.0, 10.0]);
    }

    #[test]
    fn every_vertex_is_used() {
        let g = light_beam_geometry(BeamDimensions::default());
        for v in 0..8u16 {
            assert!(g.indices.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn beam_material_blends_without_depth_writes() {
        let mesh = light_beam(BeamDimensions::default(), Transform::identity());
        assert!(mesh.material.transparent);
        assert!(mesh.material.vertex_colors);
        assert!(!mesh.material.depth_write);
        assert_eq!(mesh.material.side, Side::Double);
    }
}
