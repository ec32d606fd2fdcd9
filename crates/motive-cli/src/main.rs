use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motive_core::Stagger;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "motive")]
#[command(author, version, about = "Demos for the Motive motion engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a cascading entrance over a row of items
    Cascade {
        /// Number of items in the cascade
        #[arg(short, long, default_value_t = 4)]
        count: usize,
        /// Delay step between items
        #[arg(short, long, value_enum, default_value_t = StaggerArg::Tight)]
        stagger: StaggerArg,
    },
    /// Fade a single element in, then out
    Fade,
    /// Grow an element's layout size frame by frame
    Resize,
    /// Print a sample table for every motion curve
    Curves,
    /// List the named duration tokens
    Durations,
}

#[derive(Clone, Copy, ValueEnum)]
enum StaggerArg {
    Zero,
    Loose,
    Loosest,
    Medium,
    Normal,
    Tight,
    Tightest,
}

impl From<StaggerArg> for Stagger {
    fn from(arg: StaggerArg) -> Self {
        match arg {
            StaggerArg::Zero => Stagger::Zero,
            StaggerArg::Loose => Stagger::Loose,
            StaggerArg::Loosest => Stagger::Loosest,
            StaggerArg::Medium => Stagger::Medium,
            StaggerArg::Normal => Stagger::Normal,
            StaggerArg::Tight => Stagger::Tight,
            StaggerArg::Tightest => Stagger::Tightest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cascade { count, stagger } => {
            commands::cascade::run(count, stagger.into()).await
        }
        Commands::Fade => commands::fade::run().await,
        Commands::Resize => commands::resize::run().await,
        Commands::Curves => commands::curves::run(),
        Commands::Durations => commands::durations::run(),
    }
}
