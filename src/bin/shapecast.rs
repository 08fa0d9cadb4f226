//! Provides the `shapecast-cli` tool.
//!
//! Usage: `shapecast-cli <image> [options]`
//!
//! Sends the image to the generation endpoint and renders the returned model
//! to a PNG next to the input file.
//!
//! # Examples
//! ```text
//! shapecast-cli photo.png -e http://10.0.0.5:8000 --size 768 --azimuth 30
//! ```

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use shapecast::generation::GenerationState;
use shapecast::{codec, Config, HttpBackend, ModelViewer, Session};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(help = "The image to generate a model from (.png, .jpg, .jpeg)")]
    image: PathBuf,
    #[arg(short = 'e', long, help = "Base address of the generation service")]
    endpoint: Option<String>,
    #[arg(short = 'c', long, help = "A JSON5 config file")]
    config: Option<PathBuf>,
    #[arg(short = 'o', long, help = "Where to write the rendered PNG")]
    output: Option<PathBuf>,
    #[arg(long = "save-glb", help = "Also write the generated GLB to this path")]
    save_glb: Option<PathBuf>,
    #[arg(long, help = "Edge length of the rendered image in pixels")]
    size: Option<u32>,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, help = "Orbit left by this many degrees")]
    azimuth: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, help = "Orbit up by this many degrees")]
    elevation: f32,
    #[arg(long, default_value_t = 1.0, help = "Camera distance scale; below 1 zooms in")]
    zoom: f32,
    #[arg(short = 'v', action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    SimpleLogger::new()
        .with_level(match args.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init()
        .expect("Only Logger Setup");

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    let size = args.size.unwrap_or(config.render_size);

    let session = Session::new(HttpBackend::from_config(&config)?);
    session
        .select_file(args.image.clone())
        .await
        .with_context(|| format!("cannot use {}", args.image.display()))?;

    eprintln!(
        "Generating a model from {} via {}...",
        args.image.display(),
        session.backend().url()
    );
    session.generate().await;

    let model = match session.generation() {
        GenerationState::Populated(model) => model,
        GenerationState::Failed { message, .. } => bail!("{}", message),
        other => bail!("generation did not finish: {:?}", other),
    };

    if let Some(path) = &args.save_glb {
        let blob = codec::decode_model_payload(&model)?;
        std::fs::write(path, blob.bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved {}", path.display());
    }

    let mut viewer = ModelViewer::new();
    viewer.show(&model)?;
    let controls = viewer.controls_mut();
    controls.rotate(args.azimuth.to_radians(), args.elevation.to_radians());
    controls.dolly(args.zoom);

    let output = args.output.unwrap_or_else(|| default_output(&args.image));
    let Some(frame) = viewer.render(size, size) else {
        bail!("no model to render");
    };
    frame
        .save_png(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    eprintln!("Saved {}", output.display());
    Ok(())
}

/// Returns `<stem>_model.png` next to the input image.
fn default_output(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    image.with_file_name(format!("{}_model.png", stem))
}
