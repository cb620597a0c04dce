//! jrewrite CLI
//!
//! Command-line interface for the jrewrite Java rewriting engine

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::error;

#[derive(Parser)]
#[command(name = "jrewrite")]
#[command(about = "jrewrite: source-preserving refactorings for Java")]
#[command(version = jrewrite_core::VERSION)]
#[command(
    long_about = "jrewrite: source-preserving refactorings for Java\n\
\n\
Structural edits are applied to Java sources while every untouched byte\n\
(comments, blank lines, formatting) stays exactly as written.\n\
\n\
Examples:\n  \
jrewrite check src/                        # Verify sources parse losslessly\n  \
jrewrite apply rename.json src/ --diff     # Preview an edit script\n  \
jrewrite apply rename.json src/ --write    # Apply it in place\n  \
jrewrite config init                       # Create .jrewrite.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.jrewrite.json/.jrewrite.jsonc)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that Java sources parse losslessly and report syntax errors
    Check {
        /// Files or directories to check
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format for results")]
        format: OutputFormat,

        /// Include patterns (glob syntax)
        #[arg(long, help = "Include files matching pattern (can be used multiple times)")]
        include: Vec<String>,

        /// Exclude patterns (glob syntax)
        #[arg(long, help = "Exclude files matching pattern (can be used multiple times)")]
        exclude: Vec<String>,
    },

    /// Apply an edit script to Java sources
    Apply {
        /// Edit script (JSON or JSONC)
        #[arg(help = "Path to the edit script")]
        script: PathBuf,

        /// Files or directories to rewrite
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Write results back to the files
        #[arg(long, help = "Write rewritten sources to files")]
        write: bool,

        /// Show a unified diff of the changes
        #[arg(long, help = "Show diff of proposed changes")]
        diff: bool,

        /// Exit with non-zero code if any file would change
        #[arg(
            long,
            help = "Check whether files would change without modifying them",
            conflicts_with = "write"
        )]
        check: bool,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format for results")]
        format: OutputFormat,

        /// Include patterns (glob syntax)
        #[arg(long, help = "Include files matching pattern (can be used multiple times)")]
        include: Vec<String>,

        /// Exclude patterns (glob syntax)
        #[arg(long, help = "Exclude files matching pattern (can be used multiple times)")]
        exclude: Vec<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show the configuration in effect
    Show,

    /// Print the JSON schema of the configuration file
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long, help = "Output file for the schema")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "jrewrite=warn",
        1 => "jrewrite=info",
        2 => "jrewrite=debug",
        _ => "jrewrite=trace",
    };
    jrewrite_core::init_tracing_with_filter(log_level);

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(2);
    }

    match run_command(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", colored::Colorize::red("error:"), e);
            std::process::exit(2);
        }
    }
}

/// Run the selected command; `Ok(false)` means it completed but found problems
fn run_command(cli: Cli) -> Result<bool> {
    let paths_or_cwd = |paths: Vec<PathBuf>| {
        if paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            paths
        }
    };

    match cli.command {
        Some(Commands::Check {
            paths,
            format,
            include,
            exclude,
        }) => commands::check::check_command(paths_or_cwd(paths), format, include, exclude, cli.config),

        Some(Commands::Apply {
            script,
            paths,
            write,
            diff,
            check,
            format,
            include,
            exclude,
        }) => commands::apply::apply_command(commands::apply::ApplyOptions {
            script,
            paths: paths_or_cwd(paths),
            write,
            diff,
            check,
            format,
            include,
            exclude,
            config_path: cli.config,
        }),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { force } => commands::config::init_command(force),
            ConfigAction::Show => commands::config::show_command(cli.config),
            ConfigAction::Schema { output } => commands::config::schema_command(output),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("{} {}", jrewrite_core::NAME, jrewrite_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", jrewrite_core::VERSION);
            }
            Ok(true)
        }

        None => {
            Cli::command().print_help()?;
            Ok(true)
        }
    }
}
