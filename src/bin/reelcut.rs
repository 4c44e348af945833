use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "reelcut", version)]
struct Cli {
    /// Increase log detail (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch sources and print the composed timeline as JSON.
    Plan(CommonArgs),
    /// Fetch, compose and render the reel (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Settings JSON.
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Song sheet (CSV, first row is a header).
    #[arg(long, default_value = "data/entry.csv")]
    input: PathBuf,

    /// Download area for fetched sources.
    #[arg(long, default_value = "downloads")]
    downloads: PathBuf,

    /// Output directory for final_output.*.
    #[arg(long, default_value = "final")]
    out_dir: PathBuf,

    /// Render audio only (overrides `mp3_only`).
    #[arg(long)]
    audio_only: bool,

    /// Parallel downloads (overrides `download_jobs`).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Print the ffmpeg command instead of running it.
    #[arg(long)]
    dry_run: bool,

    /// Keep downloaded song files after rendering.
    #[arg(long)]
    keep_downloads: bool,
}

impl CommonArgs {
    fn run_options(&self) -> reelcut::RunOptions {
        reelcut::RunOptions {
            settings_path: self.settings.clone(),
            sheet_path: self.input.clone(),
            download_dir: self.downloads.clone(),
            out_dir: self.out_dir.clone(),
            audio_only: self.audio_only.then_some(true),
            download_jobs: self.jobs,
            keep_downloads: false,
            dry_run: false,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn cmd_plan(args: CommonArgs) -> anyhow::Result<()> {
    let timeline = reelcut::plan(&args.run_options())?;
    let json = serde_json::to_string_pretty(&timeline).context("serialize timeline")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = reelcut::RunOptions {
        keep_downloads: args.keep_downloads,
        dry_run: args.dry_run,
        ..args.common.run_options()
    };

    match reelcut::run(&opts)? {
        reelcut::RunOutcome::Nothing => eprintln!("no clips to process"),
        reelcut::RunOutcome::DryRun(line) => println!("{line}"),
        reelcut::RunOutcome::Rendered(outputs) => {
            if let Some(video) = &outputs.video {
                eprintln!("wrote {}", video.display());
            }
            eprintln!("wrote {}", outputs.audio.display());
        }
    }
    Ok(())
}
