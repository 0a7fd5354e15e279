use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use playground_cli::commands::{self, RunOptions, TextSource};
use playground_core::config::ConfigLoader;
use playground_core::session::CATALOG_UNAVAILABLE_MESSAGE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "playground", author, version, about = "Run code snippets on a remote Judge0 service")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        help = "Configuration file (default: ./playground.yaml or <config dir>/playground/config.yaml)"
    )]
    config: Option<PathBuf>,

    #[clap(long, short, help = "Log level; overrides logging.level from the configuration")]
    log_level: Option<String>,

    #[clap(long, help = "Base URL of the execution service")]
    base_url: Option<String>,

    #[clap(long, help = "Value of the X-RapidAPI-Host header")]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the languages the service offers
    Languages,
    /// Submit code and print its output
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[clap(long, short = 'L', help = "Language id or exact name (default: first by name)")]
    language: Option<String>,

    #[clap(long, short, conflicts_with = "code", required_unless_present = "code", help = "Source file, or - for standard input")]
    file: Option<PathBuf>,

    #[clap(long, help = "Source code given inline")]
    code: Option<String>,

    #[clap(long, conflicts_with = "stdin", help = "File fed to the program's standard input, or -")]
    stdin_file: Option<PathBuf>,

    #[clap(long, help = "Text fed to the program's standard input")]
    stdin: Option<String>,
}

impl RunArgs {
    fn into_options(self) -> RunOptions {
        let code = match (self.file, self.code) {
            (Some(path), _) => TextSource::from_path_arg(path),
            (None, Some(code)) => TextSource::Inline(code),
            (None, None) => TextSource::Inline(String::new()),
        };
        let stdin = match (self.stdin_file, self.stdin) {
            (Some(path), _) => Some(TextSource::from_path_arg(path)),
            (None, Some(text)) => Some(TextSource::Inline(text)),
            (None, None) => None,
        };

        RunOptions {
            language: self.language,
            code,
            stdin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only program output
    commands::init_logging(commands::log_level(cli.log_level.as_deref(), None));

    let mut config = ConfigLoader::load(cli.config.as_deref()).await?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    config.validate()?;

    log::set_max_level(commands::log_level(
        cli.log_level.as_deref(),
        Some(config.logging.level.as_str()),
    ));

    let playground = commands::start_playground(&config).await;

    match cli.command {
        Commands::Languages => {
            if !playground.catalog_available() {
                eprintln!("{}", CATALOG_UNAVAILABLE_MESSAGE);
                std::process::exit(1);
            }
            println!("{}", commands::format_catalog(playground.catalog()));
        }
        Commands::Run(args) => {
            if let Some(selected) = playground.selected_language() {
                log::debug!("Default language: {}", selected.name);
            }

            match commands::run_code(&playground, args.into_options()).await? {
                Ok(output) => print!("{}", output),
                Err(e) => {
                    println!("{}", e.display_text());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
