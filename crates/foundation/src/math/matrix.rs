use super::Vec3;

/// 4x4 matrix in column-major order (`cols[c][r]`), the layout WGSL and the
/// map engine both use.
///
/// Kept in `f64`: Mercator translations sit near 0.5 while one meter is
/// roughly 1e-8, so composing in `f32` would lose the model entirely.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_cols(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Build from 16 values in column-major order.
    pub fn from_cols_array(v: &[f64; 16]) -> Self {
        Self {
            cols: [
                [v[0], v[1], v[2], v[3]],
                [v[4], v[5], v[6], v[7]],
                [v[8], v[9], v[10], v[11]],
                [v[12], v[13], v[14], v[15]],
            ],
        }
    }

    pub fn to_cols_array(&self) -> [f64; 16] {
        let c = &self.cols;
        [
            c[0][0], c[0][1], c[0][2], c[0][3], c[1][0], c[1][1], c[1][2], c[1][3], c[2][0],
            c[2][1], c[2][2], c[2][3], c[3][0], c[3][1], c[3][2], c[3][3],
        ]
    }

    pub fn to_f32_cols(&self) -> [[f32; 4]; 4] {
        self.cols.map(|col| col.map(|v| v as f32))
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [x, y, z, 1.0];
        m
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m.cols[2][2] = z;
        m
    }

    /// Rotation of `angle_rad` around `axis` (right-handed). `axis` is
    /// normalized here.
    pub fn rotation_axis(axis: Vec3, angle_rad: f64) -> Self {
        let a = axis.normalize();
        let (s, c) = angle_rad.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (a.x, a.y, a.z);
        Self {
            cols: [
                [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
                [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
                [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn rotation_x(angle_rad: f64) -> Self {
        Self::rotation_axis(Vec3::X, angle_rad)
    }

    pub fn rotation_y(angle_rad: f64) -> Self {
        Self::rotation_axis(Vec3::Y, angle_rad)
    }

    pub fn rotation_z(angle_rad: f64) -> Self {
        Self::rotation_axis(Vec3::Z, angle_rad)
    }

    /// Right-handed perspective projection with depth mapped to `[0, 1]`.
    pub fn perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, far / (near - far), -1.0],
                [0.0, 0.0, (near * far) / (near - far), 0.0],
            ],
        }
    }

    pub fn mul_vec4(&self, v: [f64; 4]) -> [f64; 4] {
        let c = &self.cols;
        let mut out = [0.0; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = c[0][row] * v[0] + c[1][row] * v[1] + c[2][row] * v[2] + c[3][row] * v[3];
        }
        out
    }

    /// Transform a point and apply the perspective divide.
    pub fn project_point(&self, p: Vec3) -> Vec3 {
        let [x, y, z, w] = self.mul_vec4([p.x, p.y, p.z, 1.0]);
        if w == 0.0 {
            Vec3::new(x, y, z)
        } else {
            Vec3::new(x / w, y / w, z / w)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    /// `self * rhs`: `rhs` is applied to a point first.
    fn mul(self, rhs: Self) -> Self::Output {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut c = [[0.0f64; 4]; 4];
        for col in 0..4 {
            for row in 0..4 {
                c[col][row] = a[0][row] * b[col][0]
                    + a[1][row] * b[col][1]
                    + a[2][row] * b[col][2]
                    + a[3][row] * b[col][3];
            }
        }
        Self { cols: c }
    }
}

/// Euler angles in radians, applied in `XYZ` order: the matrix is
/// `Rx * Ry * Rz`, so `z` acts on a point first.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_matrix(self) -> Mat4 {
        Mat4::rotation_x(self.x) * Mat4::rotation_y(self.y) * Mat4::rotation_z(self.z)
    }
}
