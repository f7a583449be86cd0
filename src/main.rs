use std::path::PathBuf;
use std::time::Instant;

use gltut_core::{
    camera::OrbitCamera,
    config::Config,
    frame::{FrameInput, FrameLoop},
};

use crate::abs::App;
use crate::error::AppError;
use crate::renderer::Renderer;

mod abs;
mod asset;
mod error;
mod input;
mod logging;
mod renderer;

const CONFIG_FILE: &str = "gltut.json";

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("gltut").join("config.json"));
    }
    candidates
}

fn run(config: Config) -> Result<(), AppError> {
    let mut app = App::new(&config.window)?;
    let mesh = asset::load_mesh(&config.assets.scene)?;
    let mut renderer = Renderer::new(
        &app.gl,
        &config.assets.shader_dir,
        &mesh,
        config.surface.extent()?,
    )?;

    let mut frame_loop = FrameLoop::new(
        config.stage,
        OrbitCamera::from(config.camera),
        renderer.surface().extent(),
        mesh.index_count() as u32,
        config.clear_color,
    );
    renderer.submit(&frame_loop.setup());
    log::info!("starting at stage {:?}", frame_loop.stage());

    let start = Instant::now();
    while !frame_loop.should_close() {
        for event in app.event_pump.poll_iter() {
            if let Some(event) = input::translate(&event) {
                frame_loop.handle_event(event);
            }
        }

        let frame = FrameInput {
            elapsed: start.elapsed().as_secs_f32(),
            framebuffer: app.framebuffer_size(),
        };
        renderer.submit(&frame_loop.plan(&frame));
        app.present();
    }

    log::info!("closing");
    Ok(())
}

fn main() {
    let (config, source) = match Config::load_first(&config_candidates()) {
        Ok(loaded) => loaded,
        Err(err) => {
            let err = AppError::from(err);
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
    match &source {
        Some(path) => log::info!("loaded config from {}", path.display()),
        None => log::info!("no config file found, using defaults"),
    }

    if let Err(err) = run(config) {
        log::error!("{err}");
        std::process::exit(err.exit_code());
    }
}
