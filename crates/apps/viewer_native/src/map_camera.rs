//! Map camera producing the main matrix handed to custom layers.

use std::f64::consts::FRAC_PI_2;

use foundation::math::{Mat4, MercatorCoordinate};

pub const TILE_SIZE: f64 = 512.0;
/// Vertical field of view, `atan(0.75) * 2`.
pub const FOV_Y_RAD: f64 = 0.643_501_108_793_284_4;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapCamera {
    pub center_lng: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub pitch_deg: f64,
    pub bearing_deg: f64,
    pub width: u32,
    pub height: u32,
}

impl MapCamera {
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    pub fn camera_to_center_distance(&self) -> f64 {
        0.5 / (FOV_Y_RAD / 2.0).tan() * f64::from(self.height)
    }

    /// Near and far planes in pixels. The far plane reaches just past the
    /// furthest visible ground point at the current pitch.
    pub fn clip_planes(&self) -> (f64, f64) {
        let pitch = self.pitch_deg.to_radians();
        let half_fov = FOV_Y_RAD / 2.0;
        let dist = self.camera_to_center_distance();
        let ground_angle = FRAC_PI_2 + pitch;
        let angle = (std::f64::consts::PI - ground_angle - half_fov)
            .clamp(0.01, std::f64::consts::PI - 0.01);
        let top_half_surface = half_fov.sin() * dist / angle.sin();
        let furthest = (FRAC_PI_2 - pitch).cos() * top_half_surface + dist;
        (f64::from(self.height) / 50.0, furthest * 1.01)
    }

    /// Mercator `[0, 1]` world to clip space, depth in `[0, 1]`.
    pub fn main_matrix(&self) -> Mat4 {
        let world = self.world_size();
        let center = MercatorCoordinate::from_lng_lat(self.center_lng, self.center_lat, 0.0);
        let (near, far) = self.clip_planes();
        let aspect = f64::from(self.width) / f64::from(self.height);

        Mat4::perspective_rh_z0(FOV_Y_RAD, aspect, near, far)
            * Mat4::scale(1.0, -1.0, 1.0)
            * Mat4::translation(0.0, 0.0, -self.camera_to_center_distance())
            * Mat4::rotation_x(self.pitch_deg.to_radians())
            * Mat4::rotation_z(-self.bearing_deg.to_radians())
            * Mat4::translation(-center.x * world, -center.y * world, 0.0)
            * Mat4::scale(world, world, world)
    }
}

#[cfg(test)]
mod tests {
    use super::MapCamera;
    use foundation::math::{MercatorCoordinate, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn kyiv() -> MapCamera {
        MapCamera {
            center_lng: 30.5107,
            center_lat: 50.4174,
            zoom: 20.0,
            pitch_deg: 60.0,
            bearing_deg: 0.0,
            width: 1280,
            height: 720,
        }
    }

    #[test]
    fn center_projects_to_clip_origin() {
        let cam = kyiv();
        let c = MercatorCoordinate::from_lng_lat(cam.center_lng, cam.center_lat, 0.0);
        let p = cam.main_matrix().project_point(c.as_vec3());
        assert_close(p.x, 0.0, 1e-6);
        assert_close(p.y, 0.0, 1e-6);
        assert!(p.z > 0.0 && p.z < 1.0, "depth {} outside [0, 1]", p.z);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let cam = MapCamera {
            pitch_deg: 0.0,
            ..kyiv()
        };
        let m = cam.main_matrix();
        let c = MercatorCoordinate::from_lng_lat(cam.center_lng, cam.center_lat, 0.0).as_vec3();
        let step = 1.0 / cam.world_size();

        let east = m.project_point(c + Vec3::new(step, 0.0, 0.0));
        assert!(east.x > 0.0);
        // Mercator y grows southwards, so a smaller y is further north.
        let north = m.project_point(c - Vec3::new(0.0, step, 0.0));
        assert!(north.y > 0.0);
    }

    #[test]
    fn top_down_view_shows_a_pixel_per_world_pixel() {
        let cam = MapCamera {
            pitch_deg: 0.0,
            ..kyiv()
        };
        let m = cam.main_matrix();
        let c = MercatorCoordinate::from_lng_lat(cam.center_lng, cam.center_lat, 0.0).as_vec3();
        let p = m.project_point(c + Vec3::new(1.0 / cam.world_size(), 0.0, 0.0));
        // One world pixel spans 2 / width in NDC.
        assert_close(p.x, 2.0 / f64::from(cam.width), 1e-9);
    }

    #[test]
    fn far_plane_grows_with_pitch() {
        let flat = MapCamera {
            pitch_deg: 0.0,
            ..kyiv()
        };
        let (near, far_flat) = flat.clip_planes();
        let (_, far_pitched) = kyiv().clip_planes();
        assert_close(near, 720.0 / 50.0, 1e-12);
        assert!(far_pitched > far_flat);
        assert!(far_flat > flat.camera_to_center_distance());
    }
}
