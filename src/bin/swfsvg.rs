use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swfsvg", version)]
struct Cli {
    /// More logging (repeat for trace output). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export decoded scenes as SVG documents.
    Convert(ConvertArgs),
    /// Copy embedded font outlines and advances into a glyph store.
    ExtractFonts(ExtractArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Single input scene JSON.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Text file with one input path per line.
    #[arg(long)]
    list: Option<PathBuf>,

    /// Directory of input scene JSON files.
    #[arg(long)]
    dir: Option<PathBuf>,
}

impl SourceArgs {
    fn source(&self) -> anyhow::Result<swfsvg::Source> {
        match (&self.in_path, &self.list, &self.dir) {
            (Some(p), _, _) => Ok(swfsvg::Source::File(p.clone())),
            (_, Some(p), _) => Ok(swfsvg::Source::List(p.clone())),
            (_, _, Some(p)) => Ok(swfsvg::Source::Dir(p.clone())),
            _ => anyhow::bail!("one of --in, --list or --dir is required"),
        }
    }
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Frame index (0-based). Without it every frame is exported.
    #[arg(long)]
    frame: Option<u32>,

    /// Glyph store directory used for glyphs missing from embedded fonts.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Also write a PNG preview next to each SVG.
    #[arg(long)]
    png: bool,

    /// Export options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Margin around the stage in pixels (overrides the config file).
    #[arg(long)]
    margin: Option<f64>,

    /// Outline solid fills with a 1px stroke (overrides the config file).
    #[arg(long)]
    force_stroke: bool,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Glyph store directory.
    #[arg(long)]
    fonts: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::ExtractFonts(args) => cmd_extract_fonts(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut options = match &args.config {
        Some(path) => swfsvg::ExportOptions::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => swfsvg::ExportOptions::default(),
    };
    if let Some(margin) = args.margin {
        options.margin = margin;
    }
    if args.force_stroke {
        options.force_stroke = true;
    }
    options.validate()?;

    let inputs = swfsvg::collect_sources(&args.source.source()?)
        .context("collect input scenes")?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut exporter = swfsvg::Exporter::new(options).with_png(args.png);
    if let Some(dir) = &args.fonts {
        exporter = exporter.with_store(Arc::new(swfsvg::DirGlyphStore::open(dir)));
    }
    let stats = exporter.convert_all(&inputs, &args.out, args.frame);
    if stats.converted == 0 && stats.failed > 0 {
        anyhow::bail!("all {} inputs failed", stats.failed);
    }
    eprintln!(
        "converted {} of {} inputs, wrote {} files",
        stats.converted,
        inputs.len(),
        stats.written
    );
    Ok(())
}

fn cmd_extract_fonts(args: ExtractArgs) -> anyhow::Result<()> {
    let inputs = swfsvg::collect_sources(&args.source.source()?)
        .context("collect input scenes")?;
    let store = swfsvg::DirGlyphStore::open(&args.fonts);
    let mut glyphs = 0;
    for input in &inputs {
        let result = swfsvg::Scene::from_path(input)
            .and_then(|scene| swfsvg::extract_fonts(&scene, &store));
        match result {
            Ok(stats) => glyphs += stats.glyphs_added,
            Err(e) => tracing::error!(input = %input.display(), error = %e, "font extraction failed"),
        }
    }
    eprintln!("added {glyphs} glyphs to {}", args.fonts.display());
    Ok(())
}
