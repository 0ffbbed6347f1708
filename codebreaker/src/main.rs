mod crack;
mod report;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codebreaker")]
#[command(about = "Classical cryptanalysis for rotorkit ciphertexts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Letter frequencies, index of coincidence and chi-squared against English
    Stats {
        /// Text file to analyze
        file: PathBuf,
    },

    /// Rank all Caesar shifts by fit to English
    Caesar {
        file: PathBuf,

        /// Number of candidates to show
        #[arg(long, default_value_t = 3)]
        top: usize,
    },

    /// Estimate a Vigenère period and key
    Period {
        file: PathBuf,

        /// Longest period to try
        #[arg(long, default_value_t = 12)]
        max: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Commands::Stats { file } => stats::run(&file)?,
        Commands::Caesar { file, top } => crack::caesar_report(&file, top)?,
        Commands::Period { file, max } => crack::period_report(&file, max)?,
    };
    print!("{}", report);
    Ok(())
}
