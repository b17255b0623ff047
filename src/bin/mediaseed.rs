use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mediaseed::{
    Catalog, MediaKind, Orchestrator, PaletteRegistry, RendererChoice, RunSummary, SynthConfig,
};

#[derive(Parser, Debug)]
#[command(name = "mediaseed", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize every request of a catalog into an output directory.
    Generate(GenerateArgs),
    /// Check a catalog for duplicate or unsafe ids without writing anything.
    Validate(ValidateArgs),
    /// Write a single placeholder voice note.
    Tone(ToneArgs),
    /// Write a solid bitmap in a category's primary color.
    Swatch(SwatchArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Catalog JSON.
    #[arg(long)]
    catalog: PathBuf,

    /// Output root; `images/` and `voice/` are created under it.
    #[arg(long)]
    out: PathBuf,

    /// Synthesis config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Palette/icon JSON extending the built-in table.
    #[arg(long)]
    palettes: Option<PathBuf>,

    /// Skip the rich renderer and write raw bitmaps only.
    #[arg(long)]
    no_rich: bool,

    /// Process requests on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for palette color choice.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Catalog JSON.
    #[arg(long)]
    catalog: PathBuf,
}

#[derive(Parser, Debug)]
struct ToneArgs {
    /// Length in whole seconds.
    #[arg(long)]
    seconds: i64,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SwatchArgs {
    /// Palette category (unknown categories use the default grey).
    #[arg(long)]
    category: String,

    /// Output BMP path.
    #[arg(long)]
    out: PathBuf,

    /// Width in pixels.
    #[arg(long, default_value_t = 100)]
    width: u32,

    /// Height in pixels.
    #[arg(long, default_value_t = 100)]
    height: u32,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Validate(args) => cmd_validate(args).map(|()| ExitCode::SUCCESS),
        Command::Tone(args) => cmd_tone(args).map(|()| ExitCode::SUCCESS),
        Command::Swatch(args) => cmd_swatch(args).map(|()| ExitCode::SUCCESS),
    };

    match res {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_env("MEDIASEED_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(args: &GenerateArgs) -> anyhow::Result<SynthConfig> {
    let mut config = match &args.config {
        Some(path) => SynthConfig::from_path(path)?,
        None => SynthConfig::default(),
    }
    .with_env_overrides(|k| std::env::var(k).ok())
    .context("apply MEDIASEED_* overrides")?;

    if args.no_rich {
        config.renderer = RendererChoice::Disabled;
    }
    if args.parallel {
        config.run.parallel = true;
    }
    if args.threads.is_some() {
        config.run.threads = args.threads;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    let palettes = match &args.palettes {
        Some(path) => PaletteRegistry::from_path(path)?,
        None => PaletteRegistry::builtin(),
    };
    let catalog = read_catalog(&args.catalog)?;

    let orch = Orchestrator::with_detected_renderer(config, palettes);
    match orch.renderer_name() {
        Some(name) => tracing::info!(renderer = name, "rich rendering enabled"),
        None => tracing::info!("rich rendering unavailable; writing raw bitmaps"),
    }

    let summary = orch
        .run(&catalog, &args.out)
        .with_context(|| format!("generate into '{}'", args.out.display()))?;
    print_summary(&summary);

    Ok(if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let catalog = read_catalog(&args.catalog)?;
    catalog
        .validate()
        .with_context(|| format!("validate catalog '{}'", args.catalog.display()))?;
    println!(
        "ok: {} chats, {} requests",
        catalog.chats.len(),
        catalog.len()
    );
    Ok(())
}

fn cmd_tone(args: ToneArgs) -> anyhow::Result<()> {
    let bytes = mediaseed::encode_tone(args.seconds, &mediaseed::ToneParams::default())?;
    write_file(&args.out, &bytes)
}

fn cmd_swatch(args: SwatchArgs) -> anyhow::Result<()> {
    let registry = PaletteRegistry::builtin();
    let color = registry.lookup(&args.category).primary();
    let bytes = mediaseed::encode_bmp_solid(args.width, args.height, color)?;
    write_file(&args.out, &bytes)?;
    eprintln!("{} -> {}", args.category, color.to_hex());
    Ok(())
}

fn read_catalog(path: &Path) -> anyhow::Result<Catalog> {
    Catalog::from_path(path).with_context(|| format!("load catalog '{}'", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for (label, kind) in [("images", MediaKind::Image), ("voice", MediaKind::Voice)] {
        let c = summary.counts(kind);
        println!(
            "{label}: {} created, {} skipped, {} failed",
            c.created, c.skipped, c.failed
        );
    }
    for failed in summary.failures() {
        if let mediaseed::GenerationResult::Failed { reason, .. } = &failed.result {
            println!("failed {} ({}): {reason}", failed.id, failed.chat_id);
        }
    }
}
