use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use image::ImageReader;
use tracing::{Level, info};

use shelfscan::config::Config;
use shelfscan::detection::{Detector, YoloDetector};
use shelfscan::event::S3Event;
use shelfscan::logging::{self, LoggingConfig};
use shelfscan::storage::encode_image;
use shelfscan::{Annotator, Handler, LocalObjectStore, PipelineOrchestrator};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(about = "Annotate shelf frames with product and price tag detections")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one storage notification (JSON file) end to end
    HandleEvent {
        /// Path to the notification payload
        #[arg(value_name = "EVENT")]
        event_path: PathBuf,

        #[command(flatten)]
        config: Config,
    },

    /// Annotate a local image without touching the object store
    Annotate {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Product detector weights
        #[arg(long, value_name = "FILE")]
        product_model: PathBuf,

        /// PriceTag detector weights
        #[arg(long, value_name = "FILE")]
        price_tag_model: PathBuf,

        /// Font used for box labels instead of the built-in one
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Where to write the annotated image (defaults to the output key under the current directory)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Save stage images to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut log_config = LoggingConfig::from_env();
    if args.verbose {
        log_config.level = Level::DEBUG;
    }
    logging::init_logging(log_config);

    match args.command {
        Command::HandleEvent { event_path, config } => {
            let payload = std::fs::read_to_string(&event_path)?;
            let event = S3Event::from_json(&payload)?;

            let store = LocalObjectStore::new(&config.store_root);
            let handler = Handler::cold_start(store, &config).await?;
            let result = handler.handle_event(&event).await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Annotate {
            image_path,
            product_model,
            price_tag_model,
            font,
            out,
            debug_out,
        } => {
            let img = ImageReader::open(&image_path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
                .to_rgb8();

            let product: Arc<dyn Detector> = Arc::new(YoloDetector::load("Product", &product_model)?);
            let price_tag: Arc<dyn Detector> =
                Arc::new(YoloDetector::load("PriceTag", &price_tag_model)?);
            let annotator = Annotator::from_optional_font(font.as_deref())?;

            let mut orchestrator = PipelineOrchestrator::new(product, price_tag, annotator);
            if let Some(debug_dir) = debug_out {
                orchestrator = orchestrator.with_debug(debug_dir)?;
            }

            let filename = image_path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid image path: {}", image_path.display()))?
                .to_string();
            let annotated = orchestrator.process(&img, &filename)?;

            let out_path = out.unwrap_or_else(|| PathBuf::from(&annotated.output_key));
            if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out_path, encode_image(&annotated.image, &filename)?)?;

            info!(path = %out_path.display(), "wrote annotated image");
            println!(
                "{}: {} products, {} price tags -> {}",
                filename,
                annotated.product_count,
                annotated.price_tag_count,
                out_path.display()
            );
        }
    }

    Ok(())
}
