use anyhow::{Context, Result};
use log::LevelFilter;
use playground_client::ExecutionClientFactory;
use playground_core::{
    ExecutionClient, ExecutionWorkflow, LanguageCatalog, Playground, PlaygroundConfig,
    PlaygroundError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Where a piece of text (source code or program input) comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    /// The CLI's own standard input
    Stdin,
}

impl TextSource {
    /// `-` means standard input, anything else a file path
    pub fn from_path_arg(arg: PathBuf) -> Self {
        if arg.as_os_str() == "-" {
            TextSource::Stdin
        } else {
            TextSource::File(arg)
        }
    }

    pub async fn read(&self) -> Result<String> {
        match self {
            TextSource::Inline(text) => Ok(text.clone()),
            TextSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            TextSource::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("Failed to read standard input")?;
                Ok(text)
            }
        }
    }
}

/// `--log-level` first, then `logging.level`, then warn. Unparseable values count as unset.
pub fn log_level(cli: Option<&str>, configured: Option<&str>) -> LevelFilter {
    cli.and_then(|level| level.parse().ok())
        .or_else(|| configured.and_then(|level| level.parse().ok()))
        .unwrap_or(LevelFilter::Warn)
}

/// Install the logger at `initial`. It passes every record; later calls to
/// `log::set_max_level` move the threshold.
pub fn init_logging(initial: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .init();
    log::set_max_level(initial);
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub language: Option<String>,
    pub code: TextSource,
    pub stdin: Option<TextSource>,
}

pub fn build_client(config: &PlaygroundConfig) -> Arc<dyn ExecutionClient> {
    ExecutionClientFactory::create_http_client(
        config.api.base_url.as_str(),
        config.api.host.as_str(),
        config.api_key(),
        config.request_timeout(),
    )
}

/// Build the session; this is where the one catalog request happens
pub async fn start_playground(config: &PlaygroundConfig) -> Playground {
    let workflow =
        ExecutionWorkflow::new(build_client(config)).with_policy(config.poll_policy());
    log::debug!(
        "Polling up to {} times, at most {:?} in total",
        workflow.policy().max_attempts,
        workflow.policy().worst_case_wait()
    );
    Playground::start(workflow).await
}

/// One `id<TAB>name` line per language
pub fn format_catalog(catalog: &LanguageCatalog) -> String {
    catalog
        .languages()
        .iter()
        .map(|language| format!("{}\t{}", language.id, language.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill the session from `options` and run it.
///
/// The outer error covers local problems (unreadable files, unknown language);
/// the inner result is the run itself.
pub async fn run_code(
    playground: &Playground,
    options: RunOptions,
) -> Result<Result<String, PlaygroundError>> {
    if let Some(query) = &options.language {
        let language = playground.select_language(query)?;
        log::info!("Selected language {} ({})", language.name, language.id);
    }

    playground.set_code(options.code.read().await?);
    if let Some(stdin) = &options.stdin {
        playground.set_stdin(stdin.read().await?);
    }

    Ok(playground.try_run().await)
}
