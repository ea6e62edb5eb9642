use std::fmt;

/// Indexed triangle geometry with optional per-vertex RGBA colors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    IndexCountNotTriangles { count: usize },
    IndexOutOfRange { index: u16, vertex_count: usize },
    ColorCountMismatch { colors: usize, vertices: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::IndexCountNotTriangles { count } => {
                write!(f, "index count {count} is not a multiple of 3")
            }
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
            GeometryError::ColorCountMismatch { colors, vertices } => {
                write!(f, "{colors} colors for {vertices} vertices")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

impl Geometry {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u16>) -> Self {
        Self {
            positions,
            colors: None,
            indices,
        }
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles {
                count: self.indices.len(),
            });
        }
        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        if let Some(colors) = &self.colors {
            if colors.len() != vertex_count {
                return Err(GeometryError::ColorCountMismatch {
                    colors: colors.len(),
                    vertices: vertex_count,
                });
            }
        }
        Ok(())
    }
}
