//! Entry point for the Veles3D mesh viewer: load the OBJ files named on
//! the command line, orbit them with the mouse.

mod cli;
mod scene_build;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = cli::parse(std::env::args().skip(1))?;
    log::info!(
        "Starting Veles3D. Backend: {:?}, window_size={}x{}, {} mesh file(s)",
        options.backends,
        options.width,
        options.height,
        options.paths.len()
    );

    let (scene, meshes) = scene_build::build(&options.paths);

    platform::run(
        platform::RunConfig {
            title: "Veles3D".into(),
            width: options.width,
            height: options.height,
            backends: options.backends,
        },
        scene,
        meshes,
    )?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
