/// Which faces a material draws.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Unlit material: color comes from `color`/`opacity`, optionally multiplied by
/// per-vertex colors. Lights do not affect it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub vertex_colors: bool,
    pub transparent: bool,
    pub depth_write: bool,
    pub side: Side,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            vertex_colors: false,
            transparent: false,
            depth_write: true,
            side: Side::Front,
        }
    }
}

impl BasicMaterial {
    /// Material color with opacity in the alpha channel.
    pub fn tint(&self) -> [f32; 4] {
        let [r, g, b] = self.color;
        [r, g, b, self.opacity]
    }
}
