mod config;
mod generator;
mod menu;
mod store;

use anyhow::Context;
use config::{Config, Environment};
use generator::Backend;
use std::path::PathBuf;
use store::ResponseStore;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "heisenberg",
    about = "Ask Heisenberg a question and get a canned answer dressed up by a language model"
)]
struct Args {
    /// Path to a TOML config file
    #[structopt(short = "c", long)]
    config: Option<PathBuf>,

    /// Responses file (read and rewritten)
    #[structopt(short, long)]
    responses: Option<PathBuf>,

    /// Extra seed responses file (read only)
    #[structopt(short, long)]
    extra: Option<PathBuf>,

    /// Generation backend (naive, huggingface or anthropic)
    #[structopt(short, long)]
    backend: Option<Backend>,

    /// Maximum length passed to the generation backend
    #[structopt(short, long)]
    max_length: Option<usize>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(responses) = self.responses {
            config.files.responses = responses;
        }
        if let Some(extra) = self.extra {
            config.files.extra = extra;
        }
        if let Some(backend) = self.backend {
            config.generation.backend = backend;
        }
        if let Some(max_length) = self.max_length {
            config.generation.max_length = max_length;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    dotenv::dotenv().ok();
    let environment =
        envy::from_env::<Environment>().context("Failed to read environment variables")?;
    let args = Args::from_args();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    info!(
        backend = %config.generation.backend,
        responses = %config.files.responses.display(),
        extra = %config.files.extra.display(),
        max_length = config.generation.max_length,
        "starting heisenberg"
    );

    let generator = generator::build(&config.generation, &environment)?;
    let mut store = ResponseStore::load(&config.files.responses, &config.files.extra);
    info!(
        responses = store.responses().len(),
        counts_empty = store.counts().is_empty(),
        "loaded responses"
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    menu::run(
        &mut store,
        generator.as_ref(),
        config.generation.max_length,
        &mut input,
        &mut output,
    )
    .await
}
