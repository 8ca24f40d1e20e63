//! Camera for ray generation.

use ember_math::random::{random_f32, random_in_unit_disk};
use ember_math::{Ray, Vec3};

/// Thin-lens camera generating jittered primary rays.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before asking for rays.
#[derive(Clone, Debug)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view, degrees
    vfov: f32,
    /// Cone angle (degrees) of rays through each pixel; 0 is a pinhole
    defocus_angle: f32,
    /// Distance to the plane in perfect focus
    focus_dist: f32,

    frame: Frame,
}

/// Image plane and lens geometry derived by [`Camera::initialize`].
#[derive(Clone, Debug, Default)]
struct Frame {
    eye: Vec3,
    /// Centre of the top-left pixel on the focus plane
    first_pixel: Vec3,
    /// Offset between horizontally adjacent pixels
    step_right: Vec3,
    /// Offset between vertically adjacent pixels (pointing down)
    step_down: Vec3,
    lens_right: Vec3,
    lens_up: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            frame: Frame::default(),
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set image width and derive the height from an aspect ratio
    /// (width / height). The height is at least one pixel.
    pub fn with_aspect(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width.max(1);
        self.image_height = ((self.image_width as f32 / aspect_ratio) as u32).max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Derive the image plane from the current settings. Must run after the
    /// last builder call and before [`Camera::get_ray`].
    pub fn initialize(&mut self) {
        let back = (self.look_from - self.look_at).normalize();
        let right = self.vup.cross(back).normalize();
        let up = back.cross(right);

        let half_height = self.focus_dist * (self.vfov.to_radians() / 2.0).tan();
        let half_width = half_height * self.image_width as f32 / self.image_height as f32;

        let step_right = right * (2.0 * half_width / self.image_width as f32);
        let step_down = -up * (2.0 * half_height / self.image_height as f32);

        let top_left =
            self.look_from - back * self.focus_dist - right * half_width + up * half_height;

        let lens_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();

        self.frame = Frame {
            eye: self.look_from,
            first_pixel: top_left + 0.5 * (step_right + step_down),
            step_right,
            step_down,
            lens_right: right * lens_radius,
            lens_up: up * lens_radius,
        };
    }

    /// Generate a ray for pixel (i, j), jittered within the pixel and
    /// starting on the defocus disk, at a random shutter time.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let frame = &self.frame;
        let jitter_x = random_f32() - 0.5;
        let jitter_y = random_f32() - 0.5;

        let target = frame.first_pixel
            + (i as f32 + jitter_x) * frame.step_right
            + (j as f32 + jitter_y) * frame.step_down;

        let origin = if self.defocus_angle > 0.0 {
            let p = random_in_unit_disk();
            frame.eye + p.x * frame.lens_right + p.y * frame.lens_up
        } else {
            frame.eye
        };

        Ray::new(origin, target - origin, random_f32())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::random;

    fn pinhole(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_camera_initialize() {
        let camera = pinhole(800, 600);

        assert_eq!(camera.frame.eye, Vec3::ZERO);
        assert!(camera.frame.step_right.x > 0.0);
        assert!(camera.frame.step_down.y < 0.0);
        // 90 degree fov at unit focus: the image plane spans [-1, 1] vertically
        let rows = camera.frame.step_down.length() * 600.0;
        assert!((rows - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_camera_aspect_height() {
        let camera = Camera::new().with_aspect(400, 16.0 / 9.0);
        assert_eq!(camera.image_width, 400);
        assert_eq!(camera.image_height, 225);

        // Extremely wide images still get one row
        let camera = Camera::new().with_aspect(10, 100.0);
        assert_eq!(camera.image_height, 1);
    }

    #[test]
    fn test_camera_ray_direction() {
        random::seed(42);
        let camera = pinhole(100, 100);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.05);
        assert!((0.0..1.0).contains(&ray.time()));
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_camera_top_left_pixel_is_up_and_left() {
        random::seed(7);
        let camera = pinhole(10, 10);
        let ray = camera.get_ray(0, 0);

        assert!(ray.direction().x < 0.0);
        assert!(ray.direction().y > 0.0);
    }

    #[test]
    fn test_camera_defocus_origin_on_disk() {
        random::seed(43);
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let radius = 5.0 * 5f32.to_radians().tan();
        for _ in 0..100 {
            let ray = camera.get_ray(3, 7);
            let offset = ray.origin() - Vec3::new(0.0, 0.0, 5.0);
            assert!(offset.z.abs() < 1e-5);
            assert!(offset.length() <= radius + 1e-5);
        }
    }
}
