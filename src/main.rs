use clap::{Parser, Subcommand};
use rotorkit::cli::{show_info, transform_text, transform_to_file, TextSource, TransformOptions};
use rotorkit::logging::init_logging;
use rotorkit::Direction;
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("CARGO_PKG_VERSION");
const TARGET: &str = env!("ROTORKIT_TARGET");
const PROFILE: &str = env!("ROTORKIT_PROFILE");
const GIT_HASH: &str = env!("ROTORKIT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({} {}, {})", VERSION, GIT_HASH, TARGET, PROFILE))
}

#[derive(Parser)]
#[command(name = "rotorkit")]
#[command(author, about = "Enigma, SIGABA and M-209 rotor machine simulators", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log detail on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct TextArgs {
    /// JSON key file
    #[arg(long, short = 'k', required = true)]
    key: PathBuf,

    /// Text to process
    #[arg(conflicts_with = "input", required_unless_present = "input")]
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encipher text with a key file
    #[command(alias = "e")]
    Encode(TextArgs),

    /// Decipher text with a key file
    #[command(alias = "d")]
    Decode(TextArgs),

    /// Show machine, schedule summary and fingerprint of a key file
    #[command(alias = "i")]
    Info {
        /// JSON key file
        #[arg(long, short = 'k', required = true)]
        key: PathBuf,
    },
}

fn run_text(args: TextArgs, direction: Direction) -> rotorkit::Result<()> {
    let source = match (args.text, args.input) {
        (Some(text), _) => TextSource::Inline(text),
        (None, Some(path)) => TextSource::File(path),
        (None, None) => TextSource::Inline(String::new()),
    };
    let options = TransformOptions {
        key: args.key,
        direction,
    };
    match args.output {
        Some(path) => {
            let count = transform_to_file(&source, &path, &options)?;
            println!("Wrote {} symbols to {}", count, path.display());
        }
        None => println!("{}", transform_text(&source, &options)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("rotorkit {}", get_version());
        return ExitCode::SUCCESS;
    }

    init_logging(cli.verbose);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Encode(args) => run_text(args, Direction::Encode),
        Commands::Decode(args) => run_text(args, Direction::Decode),
        Commands::Info { key } => show_info(&key).map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
