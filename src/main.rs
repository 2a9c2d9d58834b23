use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};

use flames::output::{write_histogram, write_image};
use flames::{
    ColorSource, DensityScale, RenderMode, RenderOptions, Renderer, ToneMapper,
    SETTLE_ITERATIONS,
};

#[derive(Parser, Debug)]
#[command(name = "flames", version, about = "Render fractal flames from a JSON scene file")]
struct Cli {
    /// Input scene JSON (one flame object or an array of them).
    scene: PathBuf,

    /// Directory the images are written to.
    #[arg(long, short, default_value = ".")]
    out_dir: PathBuf,

    /// Render only the flame with this name.
    #[arg(long)]
    flame: Option<String>,

    /// Seed for the random source. Drawn at random and logged when left out.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the sample count of every flame.
    #[arg(long)]
    samples: Option<u64>,

    #[arg(long, value_enum, default_value_t = ModeArg::Gray)]
    mode: ModeArg,

    /// Color mode only: plot the blended RGB or the palette entry.
    #[arg(long, value_enum, default_value_t = SourceArg::Blend)]
    color_source: SourceArg,

    /// Density curve used by the tone mapper.
    #[arg(long, value_enum, default_value_t = ScaleArg::Log)]
    scale: ScaleArg,

    /// Exponent for `pow`/`logpow`, divisor for `arctan`.
    #[arg(long, default_value_t = 1.0)]
    scale_param: f64,

    /// Iterations discarded before plotting.
    #[arg(long, default_value_t = SETTLE_ITERATIONS)]
    settle: u32,

    /// Also write raw visit counts to `<name>.buf`.
    #[arg(long)]
    dump_histogram: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Gray,
    Color,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    Blend,
    Palette,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScaleArg {
    Linear,
    Log,
    Loglog,
    Logpow,
    Pow,
    Arctan,
}

impl Cli {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            mode: match self.mode {
                ModeArg::Gray => RenderMode::Basic,
                ModeArg::Color => RenderMode::Color,
            },
            color_source: match self.color_source {
                SourceArg::Blend => ColorSource::Blend,
                SourceArg::Palette => ColorSource::Palette,
            },
            settle_iterations: self.settle,
        }
    }

    fn density_scale(&self) -> DensityScale {
        let p = self.scale_param;
        match self.scale {
            ScaleArg::Linear => DensityScale::Linear,
            ScaleArg::Log => DensityScale::Log,
            ScaleArg::Loglog => DensityScale::LogLog,
            ScaleArg::Logpow => DensityScale::LogPow { p },
            ScaleArg::Pow => DensityScale::Pow { p },
            ScaleArg::Arctan => DensityScale::Arctan { d: p },
        }
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let mut flames = flames::scene::load_scene(&cli.scene)
        .with_context(|| format!("load scene '{}'", cli.scene.display()))?;
    if let Some(name) = &cli.flame {
        flames.retain(|f| &f.name == name);
        anyhow::ensure!(!flames.is_empty(), "no flame named '{}' in the scene", name);
    }

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "random seed");

    let renderer = Renderer::new(cli.options());
    let tone = ToneMapper::new(cli.density_scale());
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create '{}'", cli.out_dir.display()))?;

    for (i, mut flame) in flames.into_iter().enumerate() {
        if let Some(samples) = cli.samples {
            flame.samples = samples;
        }
        info!(name = %flame.name, xforms = flame.xforms.len(), "rendering flame");
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
        let out = renderer
            .render(&flame, &mut rng)
            .with_context(|| format!("render flame '{}'", flame.name))?;

        let image_path = cli.out_dir.join(format!("{}.png", flame.name));
        write_image(&image_path, &tone.map(&out.histogram))
            .with_context(|| format!("write '{}'", image_path.display()))?;

        if cli.dump_histogram {
            let buf_path = cli.out_dir.join(format!("{}.buf", flame.name));
            write_histogram(&buf_path, &out.histogram)
                .with_context(|| format!("write '{}'", buf_path.display()))?;
        }
    }
    Ok(())
}
