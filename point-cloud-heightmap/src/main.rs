/// Point cloud to height-map converter entry point
use clap::Parser;
use log::{info, warn};
use point_cloud_heightmap::controller::{LineCommandSource, PngPreviewSink};
use point_cloud_heightmap::constants::{MAX_FILL_RADIUS, MAX_HIGH_PASS_SIGMA};
use point_cloud_heightmap::{GapFillMethod, HeightmapConverter, InteractiveController, PipelineParameters};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "point-cloud-heightmap")]
#[command(about = "Render an x y z point file as a greyscale height map", long_about = None)]
struct Cli {
    /// Whitespace-delimited point file, one `x y z` sample per line
    input: PathBuf,

    /// Output PNG path (default: <input stem>_heightmap.png next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Density multiplier applied to the sample-derived pixels per unit
    #[arg(long, default_value = "1.0")]
    multiplier: f64,

    /// Lower clamp in standard deviations
    #[arg(long, default_value = "-2.5", allow_hyphen_values = true)]
    lower: f64,

    /// Upper clamp in standard deviations
    #[arg(long, default_value = "2.5", allow_hyphen_values = true)]
    upper: f64,

    /// Gap-fill radius in pixels (0..=20), 0 disables filling
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(..=MAX_FILL_RADIUS as i64))]
    fill_radius: u32,

    /// Gap-fill strategy
    #[arg(long, value_enum, default_value = "telea")]
    fill_method: GapFillMethod,

    /// High-pass Gaussian sigma in pixels (0..=10), 0 disables the filter
    #[arg(long, default_value = "1.0", value_parser = parse_sigma)]
    sigma: f64,

    /// Reserved, accepted but not applied
    #[arg(long, default_value = "0")]
    contrast: u32,

    /// Reserved, accepted but not applied
    #[arg(long, default_value = "0")]
    threshold: u32,

    /// Read slider commands from stdin and re-render until `q`/`esc`
    #[arg(short, long)]
    interactive: bool,

    /// Preview PNG rewritten after every interactive run
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Write a JSON run manifest next to the output image
    #[arg(long)]
    summary: bool,

    /// Hide the loading progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn parse_sigma(arg: &str) -> Result<f64, String> {
    let sigma: f64 = arg.parse().map_err(|e| format!("`{arg}` is not a number: {e}"))?;
    if (0.0..=MAX_HIGH_PASS_SIGMA).contains(&sigma) {
        Ok(sigma)
    } else {
        Err(format!("sigma must be within 0..={MAX_HIGH_PASS_SIGMA}"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let params = PipelineParameters {
        multiplier: cli.multiplier,
        lower_clamp_std: cli.lower,
        upper_clamp_std: cli.upper,
        fill_method: cli.fill_method,
        fill_radius: cli.fill_radius,
        high_pass_sigma: cli.sigma,
        contrast: cli.contrast,
        threshold: cli.threshold,
    };

    let converter = HeightmapConverter::new(&cli.input, cli.output.as_deref())
        .with_manifest(cli.summary)
        .with_progress(!cli.quiet);

    if !cli.interactive {
        let output = converter.convert(params)?;
        for warning in &output.warnings {
            info!("Completed with warning: {}", warning);
        }
        return Ok(());
    }

    let preview = cli
        .preview
        .unwrap_or_else(|| converter.output_path().with_extension("preview.png"));
    if !params.fits_sliders() {
        warn!(
            "Some parameters fall between slider positions; the first run uses them exactly, \
             moving any slider snaps all values to {:?}",
            PipelineParameters::from_sliders(&params.to_sliders(), params.fill_method)
        );
    }
    info!(
        "Interactive mode: `<slider> <position>` to adjust, `help` for sliders, `q` to finish. Preview: {}",
        preview.display()
    );

    let source = LineCommandSource::new(io::stdin().lock(), params.to_sliders());
    let display = PngPreviewSink::new(&preview);
    let mut controller = InteractiveController::new(source, display, params);
    converter.convert_interactive(&mut controller)?;

    Ok(())
}
