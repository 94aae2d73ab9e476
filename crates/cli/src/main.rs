//! PR Benchmark command-line entry point

use clap::Parser;
use github::GitHubClient;
use processor::Collector;
use tracing::info;

mod output;

/// Engineering-velocity benchmark for a GitHub repository's pull requests
#[derive(Parser, Debug)]
#[command(name = "pr-benchmark", version)]
struct Args {
    /// GitHub repository owner
    owner: String,
    /// GitHub repository name
    repository: String,
    /// Print summary only
    #[arg(long)]
    summary_only: bool,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Include closed PRs closed within this many days (overrides CLOSED_SINCE_DAYS)
    #[arg(long)]
    closed_since_days: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cli=info".parse()?)
                .add_directive("processor=info".parse()?)
                .add_directive("github=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = common::Config::from_env();
    if let Some(days) = args.closed_since_days {
        config.closed_since_days = days;
    }
    let token = config.require_token()?.to_string();

    info!(
        "📊 Benchmarking {}/{} via {}",
        args.owner, args.repository, config.api_url
    );

    let client = GitHubClient::new(Some(token))
        .with_base_url(config.api_url.as_str())
        .with_max_pages(config.max_pages);
    let collector = Collector::new(client, config.closed_since_days);
    let collection = collector.collect(&args.owner, &args.repository).await?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        output::write_json(&mut stdout, &collection, args.summary_only)?;
    } else {
        output::write_text(&mut stdout, &collection, args.summary_only)?;
    }

    Ok(())
}
