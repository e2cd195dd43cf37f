//! Snapping probe entry point
//!
//! Replays the mouse samples of a RON scene through the snapping pipeline and
//! prints the ranked candidates and committed point of every sample.

mod config;
mod error;
mod scene;

use std::path::PathBuf;
use std::process::ExitCode;

use rk_snap::get_increment_snap_value;

use crate::config::create_shared_config;
use crate::error::{ProbeError, ProbeResult};
use crate::scene::ProbeScene;

struct Args {
    scene: PathBuf,
    save_config: bool,
    reset_config: bool,
}

fn parse_args() -> ProbeResult<Args> {
    let mut scene = None;
    let mut save_config = false;
    let mut reset_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--save-config" => save_config = true,
            "--reset-config" => reset_config = true,
            _ if scene.is_none() => scene = Some(PathBuf::from(&arg)),
            _ => return Err(ProbeError::Usage),
        }
    }
    Ok(Args {
        scene: scene.ok_or(ProbeError::Usage)?,
        save_config,
        reset_config,
    })
}

fn run() -> ProbeResult<()> {
    let args = parse_args()?;
    let scene = ProbeScene::load(&args.scene)?;

    let shared = create_shared_config();
    if args.reset_config {
        shared.write().reset_to_defaults();
    }
    tracing::debug!("Using config {:?}", shared.read().config_file_path());

    let (settings, units) = {
        let manager = shared.read();
        let config = manager.config();
        (
            scene.settings.clone().unwrap_or_else(|| config.snap.clone()),
            scene.units.unwrap_or(config.units),
        )
    };

    if args.save_config || args.reset_config {
        let mut manager = shared.write();
        if manager.config().snap != settings || manager.config().units != units {
            let config = manager.config_mut();
            config.snap = settings.clone();
            config.units = units;
        }
        if manager.is_dirty() {
            manager.save()?;
        } else {
            tracing::info!("Config unchanged, nothing to save");
        }
    }

    println!(
        "increment {}",
        get_increment_snap_value(&scene.camera, &units)
    );
    for report in scene.run(settings)? {
        println!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rk_snap_probe=info,rk_snap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
