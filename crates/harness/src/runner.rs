//! Sequential scenario runner.

use serde::Serialize;
use tracing::{info, warn};

use crate::fixtures::FixtureLoader;
use crate::scenario::{Phase, Scenario, ScenarioFailure};
use crate::server::MockContext;

/// Result of one scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub display_name: &'static str,
    pub result: Result<(), ScenarioFailure>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a run, in execution order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunSummary {
    /// Number of passing scenarios.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Number of failing scenarios.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// True when every scenario that ran passed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failures, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioFailure> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Serializable view of the run.
    pub fn report(&self) -> RunReport {
        RunReport {
            passed: self.passed(),
            failed: self.failed(),
            scenarios: self
                .outcomes
                .iter()
                .map(|o| ScenarioReport {
                    name: o.name,
                    display_name: o.display_name,
                    passed: o.passed(),
                    phase: o.result.as_ref().err().map(|f| f.phase.to_string()),
                    error: o.result.as_ref().err().map(|f| f.error.to_string()),
                })
                .collect(),
        }
    }
}

/// Machine-readable run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub passed: usize,
    pub failed: usize,
    pub scenarios: Vec<ScenarioReport>,
}

/// One scenario in a [`RunReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: &'static str,
    pub display_name: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs `scenarios` one after another against a shared server.
///
/// The server is reset before each scenario so stubs and recorded requests
/// never leak from one scenario into the next. A failing scenario does not
/// stop the others unless its error is fatal (the server went away).
pub async fn run_scenarios(
    ctx: &MockContext,
    fixtures: &FixtureLoader,
    scenarios: &[Scenario],
) -> RunSummary {
    let mut summary = RunSummary::default();

    for scenario in scenarios {
        let result = match ctx.reset().await {
            Ok(()) => scenario.run(ctx, fixtures).await,
            Err(e) => Err(ScenarioFailure {
                scenario: scenario.name,
                phase: Phase::Arrange,
                error: e.into(),
            }),
        };

        let fatal = result.as_ref().is_err_and(ScenarioFailure::is_fatal);
        summary.outcomes.push(ScenarioOutcome {
            name: scenario.name,
            display_name: scenario.display_name,
            result,
        });

        if fatal {
            warn!(scenario = scenario.name, "Fatal failure, skipping remaining scenarios");
            break;
        }
    }

    info!(
        passed = summary.passed(),
        failed = summary.failed(),
        "Scenario run finished"
    );
    summary
}
