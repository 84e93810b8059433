use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use slideshow::{
    DirSource, Flip, PixelFormat, PngDirSink, QVGA_HEIGHT, QVGA_WIDTH, SimClock, Slideshow,
    SlideshowConfig, SoftCompositor, Surface, SurfaceSet, Transition,
};

#[derive(Parser, Debug)]
#[command(name = "slideshow", version)]
struct Cli {
    /// Log engine activity (loads, pass timing) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert any image into a 320x240 24-bit bitmap slide.
    Prepare(PrepareArgs),
    /// Run a sequence of transitions and write every frame as a PNG.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct PrepareArgs {
    /// Input image (any format the `image` crate decodes).
    input: PathBuf,

    /// Output BMP path.
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Directory slides are opened from.
    #[arg(long)]
    dir: PathBuf,

    /// Directory receiving `frame_NNNNN.png`.
    #[arg(long)]
    out: PathBuf,

    /// Slideshow config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output flip: none, h, v or hv.
    #[arg(long)]
    flip: Option<String>,

    /// Pace frames against the wall clock instead of a simulated one.
    #[arg(long)]
    realtime: bool,

    /// Print timing statistics as JSON instead of a table.
    #[arg(long)]
    stats_json: bool,

    /// JSON programme (array of transitions) run before any positional steps.
    #[arg(long)]
    program: Option<PathBuf>,

    /// Transitions, e.g. `display:a.bmp dissolve:b.bmp wipe-left:c.bmp
    /// ken-burns:d.bmp:0,0,320:60,80,160:3000 fade-out`.
    #[arg(required_unless_present = "program")]
    steps: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Prepare(args) => cmd_prepare(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("read image '{}'", args.input.display()))?;
    let bmp = slideshow::convert_to_qvga_bmp(&bytes)?;
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.output, bmp)
        .with_context(|| format!("write slide '{}'", args.output.display()))?;
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => SlideshowConfig::from_path(path)?,
        None => SlideshowConfig::default(),
    };
    let flip = args.flip.as_deref().map(Flip::parse).transpose()?;
    let mut steps = match &args.program {
        Some(path) => slideshow::programme_from_path(path)?,
        None => Vec::new(),
    };
    for s in &args.steps {
        steps.push(s.parse::<Transition>()?);
    }

    let bytes = usize::from(QVGA_WIDTH) * usize::from(QVGA_HEIGHT) * 2;
    let (mut ps, mut alpha, mut out) = (vec![0u8; bytes], vec![0u8; bytes], vec![0u8; bytes]);
    let surfaces = SurfaceSet::new(
        Surface::new(&mut ps, QVGA_WIDTH, QVGA_HEIGHT, PixelFormat::Rgb565)?,
        Surface::new(&mut alpha, QVGA_WIDTH, QVGA_HEIGHT, PixelFormat::Rgb565)?,
        Surface::new(&mut out, QVGA_WIDTH, QVGA_HEIGHT, PixelFormat::Rgb565)?,
    )?;

    let sink = PngDirSink::new(&args.out)?;
    let mut show = Slideshow::new(surfaces, SoftCompositor::default(), sink)
        .with_source(DirSource::new(&args.dir))
        .with_config(config)?;
    if !args.realtime {
        show = show.with_clock(SimClock::default());
    }
    if let Some(flip) = flip {
        show.set_flip(flip);
    }

    let mut skipped = 0usize;
    for step in &steps {
        if let Err(e) = show.run(step) {
            eprintln!("skipped {}: {e}", step.name());
            skipped += 1;
        }
    }

    let report = show.stats_report();
    let frames = show.into_sink().finish()?;
    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{frames} frames written to {}", args.out.display());
        print!("{report}");
    }

    if skipped > 0 {
        anyhow::bail!("{skipped} of {} transitions skipped", steps.len());
    }
    Ok(())
}
