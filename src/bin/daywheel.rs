use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{FixedOffset, Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use daywheel::{
    ArcSpan, EventLog, PlotConfig, PlotKind, PlotRenderer, SvgTitleOverlay, TemporalMapper,
};

#[derive(Parser, Debug)]
#[command(name = "daywheel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a polar plot of an event log as a PNG.
    Plot(PlotArgs),
    /// Print every segment's mapped dial span as JSON lines.
    Spans(SpansArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindChoice {
    Sleep,
    Feed,
    /// Render every kind, one file each.
    All,
}

impl KindChoice {
    fn kinds(self) -> Vec<PlotKind> {
        match self {
            KindChoice::Sleep => vec![PlotKind::Sleep],
            KindChoice::Feed => vec![PlotKind::Feed],
            KindChoice::All => PlotKind::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
struct ZoneArgs {
    /// Fixed local zone as minutes east of UTC. Defaults to the system zone.
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
}

#[derive(Parser, Debug)]
struct PlotArgs {
    /// Input event log JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Which events to plot.
    #[arg(long, value_enum, default_value_t = KindChoice::Sleep)]
    kind: KindChoice,

    /// Output PNG path. With `--kind all`, the kind is appended to the file stem.
    #[arg(long)]
    out: PathBuf,

    /// Rendering config JSON; command-line flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Title font size in points. Moves a default title origin along with it.
    #[arg(long)]
    title_size: Option<f32>,

    /// Extra directory to load title fonts from (repeatable).
    #[arg(long)]
    font_dir: Vec<PathBuf>,

    #[command(flatten)]
    zone: ZoneArgs,
}

#[derive(Parser, Debug)]
struct SpansArgs {
    /// Input event log JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Which events to map.
    #[arg(long, value_enum, default_value_t = KindChoice::Sleep)]
    kind: KindChoice,

    #[command(flatten)]
    zone: ZoneArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => match fixed_zone(&args.zone)? {
            Some(zone) => cmd_plot(&args, zone),
            None => cmd_plot(&args, Local),
        },
        Command::Spans(args) => match fixed_zone(&args.zone)? {
            Some(zone) => cmd_spans(&args, zone),
            None => cmd_spans(&args, Local),
        },
    }
}

fn fixed_zone(args: &ZoneArgs) -> anyhow::Result<Option<FixedOffset>> {
    let Some(minutes) = args.utc_offset_minutes else {
        return Ok(None);
    };
    let zone = minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("utc offset of {minutes} minutes is out of range"))?;
    Ok(Some(zone))
}

fn load_config(args: &PlotArgs) -> anyhow::Result<PlotConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            serde_json::from_str::<PlotConfig>(&s)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => PlotConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(size) = args.title_size {
        config.set_title_size(size);
    }
    Ok(config)
}

fn output_path(out: &Path, kind: PlotKind, multiple: bool) -> PathBuf {
    if !multiple {
        return out.to_path_buf();
    }
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plot".to_string());
    let ext = out
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    out.with_file_name(format!("{stem}-{kind}.{ext}"))
}

fn cmd_plot<Tz>(args: &PlotArgs, zone: Tz) -> anyhow::Result<()>
where
    Tz: TimeZone + Send + Sync,
{
    let log = EventLog::from_path(&args.in_path)?;
    let config = load_config(args)?;
    let overlay = SvgTitleOverlay::with_font_dirs(&args.font_dir);
    let renderer = PlotRenderer::with_collaborators(
        config,
        zone.clone(),
        overlay,
        daywheel::PngEncoder::default(),
    )?;

    let kinds = args.kind.kinds();
    let multiple = kinds.len() > 1;
    kinds.into_par_iter().try_for_each(|kind| -> anyhow::Result<()> {
        let request = log
            .plot_request(kind, &zone)
            .with_context(|| format!("preparing {kind} plot"))?;
        let bytes = renderer
            .render(request)
            .with_context(|| format!("plotting {kind} data"))?;

        let out = output_path(&args.out, kind, multiple);
        daywheel::write_image_file(&out, &bytes)?;
        tracing::info!(%kind, path = %out.display(), bytes = bytes.len(), "wrote plot");
        Ok(())
    })
}

fn cmd_spans<Tz: TimeZone>(args: &SpansArgs, zone: Tz) -> anyhow::Result<()> {
    let log = EventLog::from_path(&args.in_path)?;
    for kind in args.kind.kinds() {
        let request = log.plot_request(kind, &zone)?;
        let mapper = TemporalMapper::new(request.zero, zone.clone())?;
        for (index, seg) in request.segments.iter().enumerate() {
            let span = ArcSpan::map_segment(&mapper, seg)
                .map_err(|e| e.at_segment(index))
                .with_context(|| format!("mapping {kind} segments"))?;
            let line = serde_json::json!({
                "kind": kind,
                "index": index,
                "span": span,
                "color": request.policy.classify(&span),
            });
            println!("{line}");
        }
    }
    Ok(())
}
