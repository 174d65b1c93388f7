use anyhow::{Context, Result};
use clap::Parser;
use control::{ControlConfig, HostRequest, SceneController};
use devices::FramedLink;
use scene::{HeadlessScene, Material, SceneObject};
use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ControlConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControlConfig::default(),
    };

    let mut controller =
        SceneController::new(&config, devices::create_device_table(), HeadlessScene::new());

    if let Some(path) = &args.serial {
        let source =
            File::open(path).with_context(|| format!("opening serial source {}", path.display()))?;
        let link = FramedLink::new();
        // Detached threads: a live device closes the link at end of stream,
        // a replayed capture holds its last record
        if args.serial_live {
            link.spawn_reader(source);
        } else {
            let rate = args.serial_rate.unwrap_or(args.fps).max(1);
            let interval = Duration::from_secs_f64(1.0 / f64::from(rate));
            tracing::info!("Replaying {} at {} records/s", path.display(), rate);
            link.spawn_replay(BufReader::new(source), interval);
        }
        controller = controller.with_serial(Box::new(link));
    }

    for name in &args.objects {
        controller.add_object(placeholder_object(name));
    }

    for key in &args.keys {
        if let Some(request) = controller.key_down(*key) {
            handle_request(&mut controller, request);
        }
    }

    run(&mut controller, &args);
    Ok(())
}

fn run(controller: &mut SceneController, args: &Args) {
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let report_every = args.report_every.max(1);
    let mut frame: u64 = 0;

    tracing::info!("Running at {} fps", args.fps);

    while args.frames.map_or(true, |limit| frame < limit) {
        let started = Instant::now();
        controller.update();

        if frame % report_every == 0 {
            report(controller, frame);
        }

        frame += 1;
        if let Some(remaining) = frame_time.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    report(controller, frame);
}

fn report(controller: &SceneController, frame: u64) {
    match controller.active_transform() {
        Some(transform) => tracing::info!(
            "frame {}: mode {:?}, position {:.3}, rotation {:.3}",
            frame,
            controller.mode(),
            transform.position,
            transform.rotation
        ),
        None => tracing::info!("frame {}: scene empty", frame),
    }
}

/// Stand-in for a loaded model: one grouping node and one mesh
fn placeholder_object(name: &str) -> SceneObject {
    SceneObject::new(name)
        .with_part(name, None)
        .with_part(format!("{name}/mesh"), Some(Material::imported(0xffffff)))
}

fn handle_request(controller: &mut SceneController, request: HostRequest) {
    match request {
        HostRequest::Import(import) => {
            let name = import
                .path
                .rsplit('/')
                .next()
                .unwrap_or(&import.path)
                .trim_end_matches(".glb")
                .to_string();
            controller.finish_import(placeholder_object(&name), import.replace);
        }
        HostRequest::ExportScene => {
            tracing::warn!("Scene export is not available in the headless viewer");
        }
    }
}
