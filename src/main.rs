use clap::{Parser, Subcommand};
use mosaic_core::{resize_buffer, scatter_mosaic, MosaicBuilder, PixelBuffer, ScatterOptions};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use photomosaic::api;
use photomosaic::codec::{self, ImageFormat};
use photomosaic::models::{ServerConfig, DEFAULT_BIND_ADDR};
use photomosaic::server;
use photomosaic::services::{load_image, load_tile_dir};

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(about = "Photomosaic builder - compose images from tiles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Build a grid mosaic from a base image and a directory of tiles
    Compose {
        /// Base image (PNG or JPEG)
        #[arg(short, long)]
        base: PathBuf,

        /// Directory of tile images
        #[arg(short, long)]
        tiles: PathBuf,

        /// Block side length in pixels
        #[arg(short, long)]
        size: u32,

        /// Weight of the base image in each block (0 - 1)
        #[arg(long, default_value_t = 0.0)]
        base_presence: f32,

        /// Output file; a .jpg/.jpeg extension writes JPEG, anything else PNG
        #[arg(short, long)]
        output: PathBuf,

        /// JPEG quality when writing JPEG output
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// Scatter tiles at random positions, picking the best fit for each spot
    Scatter {
        /// Base image (PNG or JPEG)
        #[arg(short, long)]
        base: PathBuf,

        /// Directory of tile images
        #[arg(short, long)]
        tiles: PathBuf,

        /// Number of tiles to place
        #[arg(short, long)]
        count: usize,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Tiles are scaled to at most 1/N of the base's sides
        #[arg(long, default_value_t = mosaic_core::scatter::DEFAULT_SIZE_DIVISOR)]
        size_divisor: u32,

        /// Output file; a .jpg/.jpeg extension writes JPEG, anything else PNG
        #[arg(short, long)]
        output: PathBuf,

        /// JPEG quality when writing JPEG output
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// Resize an image
    Resize {
        /// Input image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Target width in pixels
        #[arg(short, long)]
        width: u32,

        /// Target height; omitted keeps the aspect ratio
        #[arg(long)]
        height: Option<u32>,

        /// Output file; a .jpg/.jpeg extension writes JPEG, anything else PNG
        #[arg(short, long)]
        output: PathBuf,

        /// JPEG quality when writing JPEG output
        #[arg(short, long)]
        quality: Option<u8>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photomosaic API",
        description = "Compose photomosaics, resize images and convert them to JPEG",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_resize, api::handle_compose, api::handle_jpeg),
    components(schemas(api::ResizeForm, api::ComposeForm, api::JpegForm)),
    tags(
        (name = "Images", description = "Image processing endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Compose {
            base,
            tiles,
            size,
            base_presence,
            output,
            quality,
        }) => {
            init_cli_logging();
            run_compose_command(&base, &tiles, size, base_presence, &output, quality)
        }
        Some(Commands::Scatter {
            base,
            tiles,
            count,
            seed,
            size_divisor,
            output,
            quality,
        }) => {
            init_cli_logging();
            let mut options = ScatterOptions::new(count).size_divisor(size_divisor);
            if let Some(seed) = seed {
                options = options.seed(seed);
            }
            run_scatter_command(&base, &tiles, &options, &output, quality)
        }
        Some(Commands::Resize {
            input,
            width,
            height,
            output,
            quality,
        }) => {
            init_cli_logging();
            run_resize_command(&input, width, height, &output, quality)
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photomosaic=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn load_tiles(dir: &Path) -> anyhow::Result<Vec<PixelBuffer>> {
    let loaded = load_tile_dir(dir)
        .map_err(|e| anyhow::anyhow!("Cannot read tile directory {}: {e}", dir.display()))?;
    if !loaded.skipped.is_empty() {
        println!("Omitted {} unreadable tile(s)", loaded.skipped.len());
    }
    if loaded.tiles.is_empty() {
        anyhow::bail!("No usable tile images in {}", dir.display());
    }
    Ok(loaded.tiles)
}

fn write_output(buffer: &PixelBuffer, output: &Path, quality: Option<u8>) -> anyhow::Result<()> {
    let bytes = codec::encode(buffer, ImageFormat::from_path(output, quality))?;
    std::fs::write(output, &bytes)?;
    println!(
        "Wrote {} ({}x{}, {} bytes)",
        output.display(),
        buffer.width(),
        buffer.height(),
        bytes.len()
    );
    Ok(())
}

/// Build a grid mosaic into a file (no server needed)
fn run_compose_command(
    base: &Path,
    tiles: &Path,
    size: u32,
    base_presence: f32,
    output: &Path,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    let base = load_image(base)?;
    let tiles = load_tiles(tiles)?;

    let started = Instant::now();
    let mosaic = MosaicBuilder::new(size)
        .base_presence(base_presence)
        .compose(&base, &tiles)?;
    tracing::info!(
        tiles = tiles.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Composed mosaic"
    );

    write_output(&mosaic, output, quality)
}

/// Random-placement mosaic into a file
fn run_scatter_command(
    base: &Path,
    tiles: &Path,
    options: &ScatterOptions,
    output: &Path,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    let base = load_image(base)?;
    let tiles = load_tiles(tiles)?;

    let report: &mut dyn FnMut(usize, usize) = &mut |placed, total| {
        println!("{placed} / {total}");
    };
    let canvas = scatter_mosaic(&base, &tiles, options, Some(report))?;

    write_output(&canvas, output, quality)
}

fn run_resize_command(
    input: &Path,
    width: u32,
    height: Option<u32>,
    output: &Path,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    let image = load_image(input)?;
    let resized = resize_buffer(&image, width, height)?;
    write_output(&resized, output, quality)
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Photomosaic v{VERSION}");
    println!("Compose images from tiles over HTTP or the command line\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.unwrap_or_else(|| format!("{DEFAULT_BIND_ADDR} (default)"))
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(path) if Path::new(&path).exists() => path,
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfig:  {config_source}");

    println!("\nCommands:");
    println!("  photomosaic serve     Start the HTTP server");
    println!("  photomosaic compose   Build a grid mosaic from a tile directory");
    println!("  photomosaic scatter   Place tiles at random best-fit positions");
    println!("  photomosaic resize    Resize an image");
    println!("\nRun 'photomosaic --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photomosaic=debug,mosaic_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        max_request_mb = config.limits.max_request_mb,
        max_image_size = config.limits.max_image_size,
        max_tile_count = config.limits.max_tile_count,
        "Limits configured"
    );

    let state = server::create_app_state(config);

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Photomosaic server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
