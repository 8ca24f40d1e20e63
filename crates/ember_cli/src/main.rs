use anyhow::{Context, Result};
use clap::Parser;
use ember_math::random;

mod cli;
mod config;
mod output;
mod scenes;

use cli::Args;
use config::RenderSettings;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let settings = config::resolve(RenderSettings::from(&args), args.config.as_deref())
        .context("Failed to load render settings")?;

    // Scene layouts draw random numbers, so seed before building
    random::seed(settings.seed());
    let mut scene = scenes::build(settings.scene());
    settings.apply(&mut scene);
    scene.camera.initialize();

    let image = ember_renderer::render(
        &scene.camera,
        scene.world.as_ref(),
        scene.lights.as_deref(),
        &scene.config,
    );

    let path = settings.output();
    output::save(&image, &path)
        .with_context(|| format!("Failed to save image to {}", path.display()))?;

    Ok(())
}
