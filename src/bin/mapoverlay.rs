use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mapoverlay", version)]
struct Cli {
    /// Log pipeline stages and every absorbed problem to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw model output over a background image.
    Render(RenderArgs),
    /// Recover the element tree only and print it as JSON.
    Parse(ParseArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// File holding the model output, or `-` for stdin.
    #[arg(long)]
    markup: PathBuf,

    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Output image path (overrides the config).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fallback background (overrides the config).
    #[arg(long)]
    fallback_background: Option<PathBuf>,

    /// Extra font directory; may be repeated.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Skip system fonts.
    #[arg(long)]
    no_system_fonts: bool,

    /// Overlay resampling filter (overrides the config).
    #[arg(long, value_enum)]
    filter: Option<FilterChoice>,

    /// Print the full JSON report instead of just the output path.
    #[arg(long)]
    report: bool,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// File holding the model output, or `-` for stdin.
    #[arg(long)]
    markup: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<FilterChoice> for mapoverlay::ResizeFilter {
    fn from(c: FilterChoice) -> Self {
        match c {
            FilterChoice::Nearest => mapoverlay::ResizeFilter::Nearest,
            FilterChoice::Triangle => mapoverlay::ResizeFilter::Triangle,
            FilterChoice::CatmullRom => mapoverlay::ResizeFilter::CatmullRom,
            FilterChoice::Lanczos3 => mapoverlay::ResizeFilter::Lanczos3,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Parse(args) => cmd_parse(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mapoverlay=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_markup(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read markup from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("read markup '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(p) => mapoverlay::RenderConfig::from_path(p)?,
        None => mapoverlay::RenderConfig::default(),
    };
    if let Some(out) = args.out {
        config.output_path = out;
    }
    if let Some(fallback) = args.fallback_background {
        config.fallback_background = fallback;
    }
    config.font_dirs.extend(args.font_dirs);
    if args.no_system_fonts {
        config.system_fonts = false;
    }
    if let Some(filter) = args.filter {
        config.resize_filter = filter.into();
    }
    config.validate()?;

    if let Some(parent) = config.output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let markup = read_markup(&args.markup)?;
    let renderer = mapoverlay::OverlayRenderer::new(config);
    let report = renderer.render(&markup, &args.background)?;

    if args.report {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize render report")?
        );
    } else {
        println!("{}", report.output.display());
    }
    Ok(())
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let markup = read_markup(&args.markup)?;
    let mut diags = mapoverlay::Diagnostics::new();
    let recovered = mapoverlay::recover_document(&markup, &mut diags)?;

    let out = serde_json::json!({
        "recovered": recovered,
        "diagnostics": diags,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize recovered tree")?
    );
    Ok(())
}
