//! Fundstr UI verification CLI
//!
//! Runs one named verification scenario against a running Fundstr instance
//! and exits non-zero if any step fails.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fundstr_verify::browser::{Session, SessionConfig};
use fundstr_verify::runner::{RunnerOptions, StepSequence, VerificationRunner};
use fundstr_verify::scenarios;
use url::Url;

/// Fundstr UI verification runner
#[derive(Parser, Debug)]
#[command(name = "fundstr-verify")]
#[command(version)]
#[command(about = "Drive a headless browser through the Fundstr discovery flow and capture screenshot evidence")]
struct Args {
    /// Base URL of the running app
    #[arg(long, default_value = "http://localhost:9000")]
    base_url: String,

    /// Scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::FindCreators)]
    scenario: Scenario,

    /// Search term for the search scenario
    #[arg(long, default_value = "dergigi")]
    search: String,

    /// Directory for captured screenshots
    #[arg(long, default_value = "verification-shots")]
    shots_dir: String,

    /// Run the onboarding wizard before the scenario
    #[arg(long)]
    with_onboarding: bool,

    /// Run in headless mode
    #[arg(long, default_value = "true")]
    headless: bool,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Named verification journeys
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Initial load of the Find Creators page
    FindCreators,
    /// Search the discovery page
    Search,
    /// Open the first creator's profile modal
    ProfileModal,
    /// Subscribe from a creator card
    Subscribe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let base_url = Url::parse(&args.base_url)
        .with_context(|| format!("invalid base URL: {}", args.base_url))?;

    let mut sequence: StepSequence = match args.scenario {
        Scenario::FindCreators => scenarios::find_creators_initial(),
        Scenario::Search => scenarios::find_creators_search(&args.search),
        Scenario::ProfileModal => scenarios::creator_profile_modal(),
        Scenario::Subscribe => scenarios::subscribe_from_card(),
    };
    if args.with_onboarding {
        sequence = sequence.with_prelude(scenarios::onboarding_prelude());
    }

    let mut config = SessionConfig::builder().headless(args.headless);
    if let Some(ref path) = args.chrome_path {
        config = config.chrome_path(path.clone());
    }
    let session = Session::launch(config.build())
        .await
        .context("failed to launch browser session")?;

    let options = RunnerOptions::new(base_url).shots_dir(&args.shots_dir);
    let result = VerificationRunner::new(session, options).run(&sequence).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for artifact in &result.artifacts {
            tracing::info!(
                "artifact {}: {} ({} bytes)",
                artifact.label,
                artifact.path.display(),
                artifact.bytes
            );
        }
        tracing::info!("{}", result.summary());
    }

    if !result.succeeded {
        std::process::exit(1);
    }
    Ok(())
}
