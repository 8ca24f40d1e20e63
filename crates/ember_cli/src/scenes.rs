//! Demo scene catalogue.
//!
//! Each builder returns a finished world (wrapped in a BVH), the subset of
//! emitters worth sampling directly, and the camera and quality the scene
//! was composed for.

use clap::ValueEnum;
use ember_core::{CheckerTexture, ImageTexture, NoiseTexture, Texture};
use ember_math::random::{random_f32, random_range, random_vec3};
use ember_math::{Color, Vec3};
use ember_renderer::{
    make_box, Background, BvhNode, Camera, ConstantMedium, Dielectric, DiffuseLight, Hittable,
    HittableList, Lambertian, Material, Metal, Planar, RenderConfig, Rotate, Sphere, Translate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Bitmap used by the globe scenes, relative to the working directory.
pub const EARTH_TEXTURE: &str = "earthmap.jpg";

const SKY_BLUE: Color = Color::new(0.7, 0.8, 1.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneName {
    #[default]
    BouncingSpheres,
    CheckeredSpheres,
    Earth,
    PerlinSpheres,
    Quads,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    FinalScene,
}

/// A scene ready to render.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    /// Emitters for light sampling; `None` samples materials only.
    pub lights: Option<Arc<dyn Hittable>>,
    /// Camera as composed; call `initialize` after any overrides.
    pub camera: Camera,
    pub aspect_ratio: f32,
    pub config: RenderConfig,
}

impl Scene {
    fn new(world: HittableList, camera: Camera, aspect_ratio: f32, config: RenderConfig) -> Self {
        Self {
            world: Arc::new(BvhNode::from_list(world)),
            lights: None,
            camera,
            aspect_ratio,
            config,
        }
    }

    fn with_lights(mut self, lights: HittableList) -> Self {
        self.lights = Some(Arc::new(lights));
        self
    }
}

/// Build the named scene. Draws from the thread's random generator, so seed
/// it first for a reproducible layout.
pub fn build(name: SceneName) -> Scene {
    log::info!("Building scene {:?}", name);
    match name {
        SceneName::BouncingSpheres => bouncing_spheres(),
        SceneName::CheckeredSpheres => checkered_spheres(),
        SceneName::Earth => earth(),
        SceneName::PerlinSpheres => perlin_spheres(),
        SceneName::Quads => quads(),
        SceneName::SimpleLight => simple_light(),
        SceneName::CornellBox => cornell_box(),
        SceneName::CornellSmoke => cornell_smoke(),
        SceneName::FinalScene => final_scene(),
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

fn light(emit: Color) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::new(emit))
}

/// Load a bitmap, falling back to the cyan placeholder if it can't be read.
fn load_texture(path: impl AsRef<Path>) -> Arc<dyn Texture> {
    let path = path.as_ref();
    match ImageTexture::load(path) {
        Ok(texture) => Arc::new(texture),
        Err(err) => {
            log::warn!("Using placeholder for {}: {}", path.display(), err);
            Arc::new(ImageTexture::default())
        }
    }
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn standard_camera(width: u32, aspect_ratio: f32, look_from: Vec3, look_at: Vec3) -> Camera {
    Camera::new()
        .with_aspect(width, aspect_ratio)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
}

fn bouncing_spheres() -> Scene {
    let mut world = HittableList::new();
    world.push(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker())),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f32();
            let center = Vec3::new(
                a as f32 + 0.9 * random_f32(),
                0.2,
                b as f32 + 0.9 * random_f32(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vec3(0.0, 1.0) * random_vec3(0.0, 1.0);
                let center2 = center + Vec3::new(0.0, random_range(0.0, 0.5), 0.0);
                world.push(Sphere::moving(center, center2, 0.2, lambertian(albedo)));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(0.5, 1.0);
                let fuzz = random_range(0.0, 0.5);
                world.push(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                world.push(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    world.push(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.push(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let aspect = 16.0 / 9.0;
    let camera = Camera::new()
        .with_aspect(1200, aspect)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);
    let config = RenderConfig::default().with_background(Background::Solid(SKY_BLUE));

    Scene::new(world, camera, aspect, config)
}

fn checkered_spheres() -> Scene {
    let surface = Arc::new(Lambertian::from_texture(checker()));
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, surface.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, surface));

    let aspect = 16.0 / 9.0;
    let camera = standard_camera(400, aspect, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO);
    let config = RenderConfig::default().with_background(Background::Solid(SKY_BLUE));

    Scene::new(world, camera, aspect, config)
}

fn earth() -> Scene {
    let surface = Arc::new(Lambertian::from_texture(load_texture(EARTH_TEXTURE)));
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::ZERO, 2.0, surface));

    let aspect = 16.0 / 9.0;
    let camera = standard_camera(400, aspect, Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO);
    let config = RenderConfig::default()
        .with_quality(3, 10)
        .with_background(Background::Solid(SKY_BLUE));

    Scene::new(world, camera, aspect, config)
}

fn perlin_spheres() -> Scene {
    let marble = Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(4.0))));
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    let aspect = 16.0 / 9.0;
    let camera = standard_camera(400, aspect, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO);
    let config = RenderConfig::default().with_background(Background::Solid(SKY_BLUE));

    Scene::new(world, camera, aspect, config)
}

fn quads() -> Scene {
    let mut world = HittableList::new();
    world.push(Planar::quad(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        lambertian(Color::new(1.0, 0.2, 0.2)),
    ));
    world.push(Planar::triangle(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        lambertian(Color::new(0.2, 1.0, 0.2)),
    ));
    world.push(Planar::annulus(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        0.6,
        lambertian(Color::new(0.2, 0.2, 1.0)),
    ));
    world.push(Planar::ellipse(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        lambertian(Color::new(1.0, 0.5, 0.0)),
    ));
    world.push(Planar::quad(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lambertian(Color::new(0.2, 0.8, 0.8)),
    ));

    let camera = Camera::new()
        .with_aspect(400, 1.0)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);
    let config = RenderConfig::default().with_background(Background::Solid(SKY_BLUE));

    Scene::new(world, camera, 1.0, config)
}

fn simple_light() -> Scene {
    let marble = Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(4.0))));
    let mut world = HittableList::new();
    world.push(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.push(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    let glow = light(Color::splat(4.0));
    let bulb: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, glow.clone()));
    let panel: Arc<dyn Hittable> = Arc::new(Planar::quad(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        glow,
    ));
    world.add(bulb.clone());
    world.add(panel.clone());
    let lights: HittableList = [bulb, panel].into_iter().collect();

    let aspect = 16.0 / 9.0;
    let camera = standard_camera(400, aspect, Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0));

    Scene::new(world, camera, aspect, RenderConfig::default()).with_lights(lights)
}

/// The five walls of the Cornell box, without the ceiling light.
fn cornell_walls(world: &mut HittableList) -> Arc<dyn Material> {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.push(Planar::quad(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.push(Planar::quad(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    ));
    world.push(Planar::quad(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    ));
    world.push(Planar::quad(
        Vec3::splat(555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    ));
    world.push(Planar::quad(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    ));

    white
}

/// Box from the origin to `size`, spun about Y and moved into place.
fn placed_box(
    size: Vec3,
    degrees: f32,
    offset: Vec3,
    material: Arc<dyn Material>,
) -> Arc<dyn Hittable> {
    let sides: Arc<dyn Hittable> = Arc::new(make_box(Vec3::ZERO, size, material));
    let rotated: Arc<dyn Hittable> = Arc::new(Rotate::y(sides, degrees));
    Arc::new(Translate::new(rotated, offset))
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_aspect(600, 1.0)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Planar::quad(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light(Color::splat(15.0)),
    ));
    world.add(ceiling_light.clone());

    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white,
    ));

    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(glass.clone());

    let lights: HittableList = [ceiling_light, glass].into_iter().collect();
    let config = RenderConfig::default().with_quality(200, 50);

    Scene::new(world, cornell_camera(), 1.0, config).with_lights(lights)
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Planar::quad(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light(Color::splat(7.0)),
    ));
    world.add(ceiling_light.clone());

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    );
    let short = placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    );
    world.push(ConstantMedium::with_color(tall, 0.01, Color::ZERO));
    world.push(ConstantMedium::with_color(short, 0.01, Color::ONE));

    let lights: HittableList = std::iter::once(ceiling_light).collect();
    let config = RenderConfig::default().with_quality(200, 50);

    Scene::new(world, cornell_camera(), 1.0, config).with_lights(lights)
}

fn final_scene() -> Scene {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let boxes_per_side = 20;
    let mut floor = HittableList::new();
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = random_range(1.0, 101.0);
            floor.push(BvhNode::from_list(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.push(BvhNode::from_list(floor));

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Planar::quad(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light(Color::splat(7.0)),
    ));
    world.add(ceiling_light.clone());

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.push(Sphere::moving(
        center1,
        center2,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    world.push(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.push(ConstantMedium::with_color(boundary, 0.2, Color::new(0.2, 0.4, 0.9)));

    // Thin haze over everything
    let haze: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(ConstantMedium::with_color(haze, 0.0001, Color::ONE));

    world.push(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::from_texture(load_texture(EARTH_TEXTURE))),
    ));
    world.push(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(0.2)))),
    ));

    let white = lambertian(Color::splat(0.73));
    let cluster: HittableList = (0..1000)
        .map(|_| {
            let sphere: Arc<dyn Hittable> =
                Arc::new(Sphere::new(random_vec3(0.0, 165.0), 10.0, white.clone()));
            sphere
        })
        .collect();
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(cluster));
    let cluster: Arc<dyn Hittable> = Arc::new(Rotate::y(cluster, 15.0));
    world.push(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0)));

    let lights: HittableList = std::iter::once(ceiling_light).collect();
    let camera = Camera::new()
        .with_aspect(800, 1.0)
        .with_position(
            Vec3::new(478.0, 278.0, -600.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);
    let config = RenderConfig::default().with_quality(250, 40);

    Scene::new(world, camera, 1.0, config).with_lights(lights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::{random, Interval, Ray};

    const ALL: [SceneName; 9] = [
        SceneName::BouncingSpheres,
        SceneName::CheckeredSpheres,
        SceneName::Earth,
        SceneName::PerlinSpheres,
        SceneName::Quads,
        SceneName::SimpleLight,
        SceneName::CornellBox,
        SceneName::CornellSmoke,
        SceneName::FinalScene,
    ];

    #[test]
    fn test_every_scene_builds() {
        for name in ALL {
            random::seed(1);
            let scene = build(name);
            assert!(!scene.world.bounding_box().is_empty(), "{name:?}");
            assert!(scene.camera.image_width > 0 && scene.camera.image_height > 0);
            assert!(scene.config.samples_per_pixel > 0 && scene.config.max_depth > 0);
        }
    }

    #[test]
    fn test_lit_interiors_sample_lights() {
        for name in [
            SceneName::SimpleLight,
            SceneName::CornellBox,
            SceneName::CornellSmoke,
            SceneName::FinalScene,
        ] {
            let scene = build(name);
            assert_eq!(scene.config.background, Background::Solid(Color::ZERO));
            let lights = scene.lights.expect("lit scene has lights");
            assert!(scene.world.bounding_box().encloses(&lights.bounding_box()));
        }

        assert!(build(SceneName::Quads).lights.is_none());
    }

    #[test]
    fn test_scene_names_match_command_line_spelling() {
        let json = serde_json::to_string(&SceneName::CornellSmoke).unwrap();
        assert_eq!(json, "\"cornell-smoke\"");

        let parsed = SceneName::from_str("final-scene", false).unwrap();
        assert_eq!(parsed, SceneName::FinalScene);
    }

    #[test]
    fn test_layout_is_reproducible() {
        let sweep = Ray::new(Vec3::new(-11.0, 0.2, -11.0), Vec3::X, 0.0);
        let first_hit = |seed| {
            random::seed(seed);
            let scene = build(SceneName::BouncingSpheres);
            scene.world.hit(&sweep, Interval::new(0.001, 30.0)).map(|rec| rec.t)
        };

        assert_eq!(first_hit(5), first_hit(5));
    }

    #[test]
    fn test_missing_bitmap_falls_back_to_cyan() {
        let texture = load_texture("/nonexistent/ember/earth.jpg");
        assert_eq!(texture.value(0.5, 0.5, Vec3::ZERO), ImageTexture::MISSING);
    }

    #[test]
    fn test_cornell_camera_looks_into_box() {
        let mut scene = build(SceneName::CornellBox);
        scene.camera = scene.camera.with_resolution(9, 9);
        scene.camera.initialize();

        let ray = scene.camera.get_ray(4, 4);
        let rec = scene
            .world
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("centre ray hits the box");
        assert!(rec.p.z > 0.0 && rec.p.z <= 555.0 + 1e-2);
    }
}
