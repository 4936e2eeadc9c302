use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use faceswap_core::pipeline::face_swap_service::FaceSwapService;
use faceswap_core::pipeline::infrastructure::service_factory::create_service;
use faceswap_core::shared::config::FaceSwapConfig;
use faceswap_core::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL, MJPEG_MIME_TYPE};
use faceswap_core::shared::model_resolver;
use faceswap_core::video::infrastructure::mjpeg_writer::MjpegWriter;

/// Replace faces in images or a live camera feed with a source face.
#[derive(Parser)]
#[command(name = "faceswap")]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalOptions {
    /// JSON config file; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Haar cascade XML (downloaded to the user cache when omitted).
    #[arg(long, global = true)]
    cascade: Option<PathBuf>,

    /// Cascade scale step between detection passes (> 1.0).
    #[arg(long, global = true)]
    scale_factor: Option<f64>,

    /// Neighbouring hits required to keep a detection.
    #[arg(long, global = true)]
    min_neighbors: Option<i32>,

    /// Drop detections overlapping an earlier one by more than this IoU (0.0-1.0).
    #[arg(long, global = true)]
    dedup_iou: Option<f64>,

    /// JPEG output quality (1-100).
    #[arg(long, global = true)]
    quality: Option<u8>,
}

#[derive(Subcommand)]
enum Command {
    /// Swap faces in a single image and write the result as JPEG.
    Swap {
        /// Image containing the face to paste in.
        #[arg(long)]
        source: PathBuf,

        /// Image to process.
        input: PathBuf,

        /// Output JPEG file.
        output: PathBuf,
    },

    /// Stream the camera with faces swapped, as MJPEG parts.
    Live {
        /// Image containing the face to paste in. Without it frames pass through.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Camera index.
        #[arg(long)]
        camera: Option<i32>,

        /// Stop after this many frames.
        #[arg(long)]
        max_frames: Option<usize>,

        /// Write the stream here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.options)?;
    if let Command::Live {
        camera: Some(index),
        ..
    } = &cli.command
    {
        config.camera_index = *index;
    }
    validate(&config)?;

    let cascade_path = resolve_cascade(cli.options.cascade.as_deref())?;
    let service = create_service(&cascade_path, &config)?;

    match cli.command {
        Command::Swap {
            source,
            input,
            output,
        } => run_swap(&service, &source, &input, &output),
        Command::Live {
            source,
            max_frames,
            output,
            ..
        } => run_live(&service, source.as_deref(), max_frames, output.as_deref()),
    }
}

fn run_swap(
    service: &FaceSwapService,
    source: &Path,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    load_source(service, source)?;
    let bytes = read_input(input)?;
    let jpeg = service.process_frame(&bytes)?;
    fs::write(output, jpeg)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_live(
    service: &FaceSwapService,
    source: Option<&Path>,
    max_frames: Option<usize>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(source) = source {
        load_source(service, source)?;
    } else {
        log::warn!("No --source given, frames will pass through unchanged");
    }

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(fs::File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = MjpegWriter::new(sink);

    service.start_stream()?;
    log::info!("Streaming {MJPEG_MIME_TYPE}");

    let worker = service.spawn_stream();
    let limit = max_frames.unwrap_or(usize::MAX);
    let mut result = Ok(());
    while writer.parts_written() < limit {
        let Some(frame) = worker.recv() else {
            break;
        };
        if let Err(e) = writer.write_part(service.mime_type(), &frame.bytes) {
            // A closed pipe downstream ends the stream normally.
            if e.kind() != io::ErrorKind::BrokenPipe {
                result = Err(e.into());
            }
            break;
        }
    }

    service.stop_stream()?;
    let delivered = worker.finish();
    log::info!("Stream finished after {delivered} frame(s)");
    result
}

fn load_source(service: &FaceSwapService, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(path)?;
    let face = service.load_source_face(&bytes)?;
    log::info!(
        "Source face loaded from {} ({} face(s) found)",
        path.display(),
        face.face_count()
    );
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    fs::read(path).map_err(|e| format!("Cannot read {}: {e}", path.display()).into())
}

fn load_config(options: &GlobalOptions) -> Result<FaceSwapConfig, Box<dyn std::error::Error>> {
    let mut config = match &options.config {
        Some(path) => FaceSwapConfig::from_json_file(path)?,
        None => FaceSwapConfig::default(),
    };
    if let Some(v) = options.scale_factor {
        config.detection.scale_factor = v;
    }
    if let Some(v) = options.min_neighbors {
        config.detection.min_neighbors = v;
    }
    if let Some(v) = options.dedup_iou {
        config.detection.dedup_iou = Some(v);
    }
    if let Some(v) = options.quality {
        config.jpeg_quality = v;
    }
    Ok(config)
}

fn validate(config: &FaceSwapConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(iou) = config.detection.dedup_iou {
        if !(0.0..=1.0).contains(&iou) {
            return Err(format!("Dedup IoU must be between 0.0 and 1.0, got {iou}").into());
        }
    }
    if !(1..=100).contains(&config.jpeg_quality) {
        return Err(format!(
            "JPEG quality must be between 1 and 100, got {}",
            config.jpeg_quality
        )
        .into());
    }
    Ok(())
}

fn resolve_cascade(explicit: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(format!("Cascade file not found: {}", path.display()).into());
        }
        return Ok(path.to_path_buf());
    }

    log::info!("Resolving cascade: {CASCADE_MODEL_NAME}");
    let path = model_resolver::resolve(
        CASCADE_MODEL_NAME,
        CASCADE_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    Ok(path)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face cascade... {pct}%");
    } else {
        eprint!("\rDownloading face cascade... {downloaded} bytes");
    }
}
