//! CLI for sparkline — live noise-driven trend lines in your terminal.

mod commands;
mod tui;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sparkline")]
#[command(about = "sparkline — live noise-driven trend lines in your terminal")]
#[command(version = sparkline_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Chart settings shared by every subcommand. Flags override `--config`.
#[derive(Args, Debug, Clone, Default)]
struct ChartOpts {
    /// JSON config file ({"capacity", "speed", "style", "interval_ms"})
    #[arg(long)]
    config: Option<String>,

    /// Samples kept in the rolling window (default 24)
    #[arg(long)]
    capacity: Option<usize>,

    /// Samples appended per tick (default 2)
    #[arg(long)]
    speed: Option<usize>,

    /// Chart style: trend_line
    #[arg(long)]
    style: Option<String>,

    /// Tick interval (e.g. "250ms", "1s"; default 250ms)
    #[arg(long)]
    interval: Option<String>,

    /// Seed the noise field for a reproducible signal
    #[arg(long)]
    seed: Option<u64>,
}

impl ChartOpts {
    fn as_chart_args(&self) -> commands::ChartArgs<'_> {
        commands::ChartArgs {
            config_path: self.config.as_deref(),
            capacity: self.capacity,
            speed: self.speed,
            style: self.style.as_deref(),
            interval: self.interval.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive sparkline dashboard (TUI)
    Monitor {
        /// Number of charts to mount
        #[arg(long, default_value = "3")]
        charts: usize,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Tick one chart offline and print it as ASCII art
    Snapshot {
        /// Ticks to run before printing
        #[arg(long, default_value = "0")]
        ticks: u64,

        /// Raster width in pixels
        #[arg(long, default_value = "72")]
        width: u32,

        /// Raster height in pixels
        #[arg(long, default_value = "16")]
        height: u32,

        /// Print the window as JSON instead of ASCII art
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Tick a headless chart and stream each window to stdout (pipe-friendly)
    Stream {
        /// Output format
        #[arg(long, default_value = "json", value_parser = ["json", "csv"])]
        format: String,

        /// Stop after this many ticks (0 = until Ctrl-C)
        #[arg(long, default_value = "0")]
        ticks: u64,

        #[command(flatten)]
        chart: ChartOpts,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor { charts, chart } => {
            let config = commands::load_config(&chart.as_chart_args());
            commands::monitor::run(config, charts, chart.seed)
        }
        Commands::Snapshot {
            ticks,
            width,
            height,
            json,
            chart,
        } => {
            let config = commands::load_config(&chart.as_chart_args());
            commands::snapshot::run(commands::snapshot::SnapshotConfig {
                config,
                seed: chart.seed,
                ticks,
                width,
                height,
                json,
            })
        }
        Commands::Stream {
            format,
            ticks,
            chart,
        } => {
            let config = commands::load_config(&chart.as_chart_args());
            commands::stream::run(config, chart.seed, ticks, &format)
        }
    }
}
