//! Renders one of the built-in flames.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn, Level};

use flames::output::write_image;
use flames::{presets, ColorSource, RenderMode, RenderOptions, Renderer, ToneMapper};

/// Samples used to measure an attractor's extent before `--fit`.
const PROBE_SAMPLES: u64 = 100_000;

#[derive(Parser, Debug)]
#[command(name = "preset", version, about = "Render a built-in fractal flame")]
struct Cli {
    /// Preset to render.
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(presets::NAMES))]
    name: String,

    /// Output image; defaults to `<name>.png`.
    #[arg(long, short)]
    out: Option<PathBuf>,

    #[arg(long)]
    samples: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Accumulate colors instead of plain visit counts.
    #[arg(long)]
    color: bool,

    /// With `--color`, look colors up in the preset's palette.
    #[arg(long, requires = "color")]
    palette: bool,

    /// Replace the preset's window with one fitted to a probe render.
    #[arg(long)]
    fit: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else if cli.quiet {
            Level::WARN
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let mut flame =
        presets::by_name(&cli.name).with_context(|| format!("unknown preset '{}'", cli.name))?;
    if let Some(samples) = cli.samples {
        flame.samples = samples;
    }

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "random seed");
    let mut rng = StdRng::seed_from_u64(seed);

    if cli.fit {
        let probe = flame.clone().with_samples(PROBE_SAMPLES);
        let stats = Renderer::default().render(&probe, &mut rng)?.stats;
        match stats.bounds.to_window(0.05) {
            Some(window) => {
                info!(?window, "fitted window");
                flame.window = window;
            }
            None => warn!(bounds = ?stats.bounds, "attractor bounds unusable, keeping preset window"),
        }
    }

    let options = RenderOptions {
        mode: if cli.color {
            RenderMode::Color
        } else {
            RenderMode::Basic
        },
        color_source: if cli.palette {
            ColorSource::Palette
        } else {
            ColorSource::Blend
        },
        ..RenderOptions::default()
    };
    let out = Renderer::new(options).render(&flame, &mut rng)?;

    let path = cli
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", flame.name)));
    write_image(&path, &ToneMapper::default().map(&out.histogram))
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}
