use crate::config::RenderSettings;
use crate::scenes::SceneName;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments.
///
/// Every render setting is optional here: anything left out falls back to
/// the `--config` file, then to the scene's own defaults.
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer", version)]
pub struct Args {
    /// Demo scene to render
    #[arg(long, value_enum)]
    pub scene: Option<SceneName>,

    /// Image width in pixels (height follows the scene's aspect ratio)
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Seed for the random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (.ppm or .png)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// JSON file with render settings
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,
}

impl From<&Args> for RenderSettings {
    fn from(args: &Args) -> Self {
        Self {
            scene: args.scene,
            image_width: args.width,
            samples_per_pixel: args.samples,
            max_depth: args.depth,
            seed: args.seed,
            output: args.output.clone(),
        }
    }
}
