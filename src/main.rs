use access_log_tools::commands;
use access_log_tools::utils::logging;
use access_log_tools::utils::processor::DEFAULT_MAX_LINE_LENGTH;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "access-log")]
#[command(about = "Web server access log analysis tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze access logs: traffic, visitors, crawlers, browsers, pages
    ///
    /// Each file gets its own report. Without files, paths are read from
    /// stdin, one per line, until EOF.
    Analyze {
        /// Path to access log file(s) - plain, .gz or .zst
        log_files: Vec<String>,

        /// Maximum line length in characters; a longer line aborts the file
        #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
        max_line_length: usize,

        /// Write all reports to this JSON file
        #[arg(short, long)]
        output: Option<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Generate shell completion scripts
    GenerateCompletion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            log_files,
            max_line_length,
            output,
            quiet,
        } => {
            let options = commands::analyze::AnalyzeOptions {
                max_line_length,
                output,
                show_progress: !quiet,
            };
            commands::analyze::run(&log_files, &options).map(|_| ())
        }
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "access-log", &mut std::io::stdout());
            Ok(())
        }
    }
}
