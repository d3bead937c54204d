//! CRUD harness runner.
//!
//! Starts a mock server, runs the selected CRUD scenarios against it and
//! exits non-zero if any of them failed.

use clap::Parser;
use crud_harness::{
    FixtureLoader, HarnessConfig, MockContext, RunSummary, init_logging, run_scenarios,
};
use tracing::info;

/// Prints one line per scenario followed by a totals line.
fn print_summary(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(()) => println!("PASS  {}", outcome.display_name),
            Err(failure) => println!("FAIL  {}: {}", outcome.display_name, failure),
        }
    }
    println!(
        "{} passed, {} failed",
        summary.passed(),
        summary.failed()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HarnessConfig::parse();
    init_logging(&config.log_level);

    if let Err(e) = config.validated() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let fixtures = FixtureLoader::from_dir_or_bundled(config.fixtures_dir.as_deref());
    let scenarios = config.selected_scenarios();

    info!(
        address = %config.socket_addr(),
        fixtures = %fixtures.dir().display(),
        scenarios = scenarios.len(),
        "Starting CRUD harness"
    );

    let mut ctx = MockContext::start(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start mock server: {}", e))?;

    let summary = run_scenarios(&ctx, &fixtures, &scenarios).await;
    ctx.stop();

    if config.json_report {
        println!("{}", serde_json::to_string_pretty(&summary.report())?);
    } else {
        print_summary(&summary);
    }

    if !summary.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
