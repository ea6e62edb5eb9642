mod config;
mod host;
mod map_camera;
mod offscreen;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gpu::{RecordingRenderer, SceneRenderer, WgpuSceneRenderer};
use layers::{BeamLayer, FrameArgs, LayerStack, ModelTransform, compose_projection};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ViewerConfig;
use crate::host::HeadlessMap;
use crate::offscreen::{MAP_BACKGROUND, Offscreen};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless map host drawing a geo-anchored light beam")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Wgpu)]
    backend: Backend,

    /// Maximum number of frames to draw
    #[arg(long)]
    frames: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Longitude of the map center and the beam anchor
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Latitude of the map center and the beam anchor
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long)]
    zoom: Option<f64>,

    /// Camera pitch in degrees
    #[arg(long)]
    pitch: Option<f64>,

    /// Camera bearing in degrees
    #[arg(long, allow_hyphen_values = true)]
    bearing: Option<f64>,

    /// Print each frame's composed beam projection as a JSON line
    #[arg(long)]
    print_matrices: bool,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Backend {
    /// Draw with wgpu into offscreen textures
    Wgpu,
    /// Record draw calls without a GPU
    Recording,
}

impl Args {
    fn apply(&self, cfg: &mut ViewerConfig) {
        if let Some(frames) = self.frames {
            cfg.frames = frames;
        }
        if let Some(width) = self.width {
            cfg.viewport.width = width;
        }
        if let Some(height) = self.height {
            cfg.viewport.height = height;
        }
        if let Some(lon) = self.lon {
            cfg.map.center[0] = lon;
            cfg.beam.anchor.longitude = lon;
        }
        if let Some(lat) = self.lat {
            cfg.map.center[1] = lat;
            cfg.beam.anchor.latitude = lat;
        }
        if let Some(zoom) = self.zoom {
            cfg.map.zoom = zoom;
        }
        if let Some(pitch) = self.pitch {
            cfg.map.pitch_deg = pitch;
        }
        if let Some(bearing) = self.bearing {
            cfg.map.bearing_deg = bearing;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = real_main(Args::parse()) {
        error!("beacon-viewer failed: {err}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    args.apply(&mut cfg);
    cfg.validate()?;

    info!(
        backend = ?args.backend,
        width = cfg.viewport.width,
        height = cfg.viewport.height,
        frames = cfg.frames,
        style = %cfg.map.style_url,
        "starting viewer"
    );

    match args.backend {
        Backend::Recording => drive::<RecordingRenderer>(&cfg, &(), &(), args.print_matrices, |_| {}),
        Backend::Wgpu => {
            let offscreen = Offscreen::new(cfg.viewport)?;
            drive::<WgpuSceneRenderer>(
                &cfg,
                &offscreen.gpu,
                &offscreen.targets,
                args.print_matrices,
                |_| offscreen.clear(MAP_BACKGROUND),
            )
        }
    }
}

fn drive<R: SceneRenderer + 'static>(
    cfg: &ViewerConfig,
    ctx: &R::Context,
    target: &R::Target,
    print_matrices: bool,
    mut draw_map: impl FnMut(&FrameArgs),
) -> Result<(), Box<dyn Error>> {
    let layer = BeamLayer::<R>::new(cfg.beam.clone())?;
    let transform = *layer.model_transform();

    let mut map = HeadlessMap::new(&cfg.map, cfg.viewport);
    let mut stack = LayerStack::new();
    map.add_layer(&mut stack, ctx, Box::new(layer))?;
    map.load(&mut stack, ctx)?;

    let drawn = map.run(&mut stack, ctx, target, cfg.frames, |args| {
        draw_map(args);
        if print_matrices {
            print_projection(args, &transform);
        }
    })?;
    map.remove_layer(&mut stack, &cfg.beam.id)?;
    let events = map.drain_events();

    info!(
        frames = drawn,
        events = events.len(),
        repaints_requested = map.repaints_requested(),
        world_size = map.camera().world_size(),
        "viewer finished"
    );
    Ok(())
}

fn print_projection(args: &FrameArgs, transform: &ModelTransform) {
    let projection = compose_projection(&args.main_matrix, transform);
    println!(
        "{}",
        json!({
            "frame": args.frame.index,
            "time_s": args.frame.time.seconds(),
            "projection": projection.to_cols_array(),
        })
    );
}
