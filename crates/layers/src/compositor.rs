//! Per-frame projection for geo-anchored models.

use foundation::math::Mat4;

use crate::model_transform::ModelTransform;

/// Model matrix `T * S(s, -s, s) * Rx * Ry * Rz`.
///
/// Y is negated because the Mercator world grows southwards while models are
/// authored with +Y pointing north.
pub fn model_matrix(t: &ModelTransform) -> Mat4 {
    let rotation_x = Mat4::rotation_x(t.rotate_x);
    let rotation_y = Mat4::rotation_y(t.rotate_y);
    let rotation_z = Mat4::rotation_z(t.rotate_z);

    Mat4::translation(t.translate_x, t.translate_y, t.translate_z)
        * Mat4::scale(t.scale, -t.scale, t.scale)
        * rotation_x
        * rotation_y
        * rotation_z
}

/// Camera projection for this frame: the host's main matrix followed by the
/// model placement. Pure; identical inputs give identical output.
pub fn compose_projection(main_matrix: &Mat4, t: &ModelTransform) -> Mat4 {
    *main_matrix * model_matrix(t)
}

#[cfg(test)]
mod tests {
    use super::{compose_projection, model_matrix};
    use crate::model_transform::{GeoAnchor, ModelTransform};
    use foundation::math::{Euler, Mat4, Vec3};
    use std::f64::consts::FRAC_PI_2;

    fn kyiv_transform() -> ModelTransform {
        ModelTransform::from_anchor(
            GeoAnchor::new(30.5107, 50.4174, 0.0),
            Vec3::new(0.7, 0.7, 0.3),
            Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            3.0,
        )
    }

    #[test]
    fn origin_maps_to_translation() {
        let t = kyiv_transform();
        let p = model_matrix(&t).project_point(Vec3::ZERO);
        assert_eq!(p, t.translation());
    }

    #[test]
    fn y_axis_is_flipped() {
        let t = ModelTransform {
            translate_x: 0.0,
            translate_y: 0.0,
            translate_z: 0.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            rotate_z: 0.0,
            scale: 2.0,
        };
        let p = model_matrix(&t).project_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(2.0, -2.0, 2.0));
    }

    #[test]
    fn rotation_applies_before_scale() {
        // Rz(90deg) sends +X to +Y, which the flip then sends to -Y.
        let t = ModelTransform {
            translate_x: 0.0,
            translate_y: 0.0,
            translate_z: 0.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            rotate_z: FRAC_PI_2,
            scale: 1.0,
        };
        let p = model_matrix(&t).project_point(Vec3::X);
        assert!((p - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn composition_is_idempotent() {
        let t = kyiv_transform();
        let main = Mat4::perspective_rh_z0(0.6435, 1.5, 0.1, 1000.0) * Mat4::scale(4e8, 4e8, 4e8);
        let a = compose_projection(&main, &t);
        let b = compose_projection(&main, &t);
        assert_eq!(a, b);
        assert!(a.is_finite());
    }

    #[test]
    fn identity_main_matrix_gives_model_matrix() {
        let t = kyiv_transform();
        assert_eq!(compose_projection(&Mat4::IDENTITY, &t), model_matrix(&t));
    }
}
