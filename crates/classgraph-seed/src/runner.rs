//! Seed execution.
//!
//! Steps run strictly in plan order, one query per step, each in its own
//! gateway session. Outside strict mode every step runs no matter what
//! happened before it.

use std::time::Instant;

use classgraph_core::Settings;
use classgraph_graph::{query, Connection, GatewayConfig, QueryExecutor};

use crate::error::Result;
use crate::plan::SeedPlan;
use crate::report::{SeedReport, StepOutcome, StepReport};

/// How a seed run reacts to failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop at the first failed step and skip the rest.
    pub strict: bool,
    /// Treat failed queries as empty results (they still get logged).
    pub swallow_errors: bool,
}

impl From<&Settings> for RunOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            strict: settings.seed.strict,
            swallow_errors: settings.neo4j.swallow_errors,
        }
    }
}

/// Run every step of `plan` through `executor`.
pub async fn run_plan<E: QueryExecutor>(
    executor: &E,
    plan: &SeedPlan,
    options: RunOptions,
) -> SeedReport {
    let mut report = SeedReport::new(&plan.database);
    tracing::info!(
        run_id = %report.run_id,
        database = %plan.database,
        steps = plan.len(),
        strict = options.strict,
        "Seed run started"
    );

    let mut aborted = false;
    for step in &plan.steps {
        if aborted {
            report.record(StepReport {
                name: step.name.clone(),
                kind: step.kind,
                outcome: StepOutcome::Skipped,
                duration_ms: 0,
            });
            continue;
        }

        let started = Instant::now();
        let q = query(&step.cypher);
        let outcome = if options.swallow_errors {
            let rows = executor.execute_lenient(q, Some(&plan.database)).await;
            StepOutcome::Succeeded { rows: rows.len() }
        } else {
            match executor.execute(q, Some(&plan.database)).await {
                Ok(rows) => StepOutcome::Succeeded { rows: rows.len() },
                Err(e) => StepOutcome::Failed {
                    reason: e.to_string(),
                },
            }
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            StepOutcome::Succeeded { rows } => {
                tracing::info!(step = %step.name, rows, duration_ms, "Seed step complete");
            }
            StepOutcome::Failed { reason } => {
                tracing::error!(step = %step.name, error = %reason, "Seed step failed");
                aborted = options.strict;
            }
            StepOutcome::Skipped => {}
        }

        report.record(StepReport {
            name: step.name.clone(),
            kind: step.kind,
            outcome,
            duration_ms,
        });
    }

    report.finish();
    tracing::info!(
        run_id = %report.run_id,
        succeeded = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Seed run finished"
    );
    report
}

/// Connect, run the plan, and close the connection.
///
/// Only connecting can fail here; step failures end up in the report.
pub async fn connect_and_run(
    config: &GatewayConfig,
    plan: &SeedPlan,
    options: RunOptions,
) -> Result<SeedReport> {
    let mut conn = Connection::connect(config).await?;
    let report = run_plan(&conn, plan, options).await;
    conn.close();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use classgraph_graph::{GraphError, Query, QueryResult};

    use super::*;
    use crate::plan::StepKind;

    /// Fails the calls whose (zero-based) index is listed in `fail_on`.
    #[derive(Default)]
    struct FakeExecutor {
        fail_on: Vec<usize>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl FakeExecutor {
        fn failing(fail_on: &[usize]) -> Self {
            Self {
                fail_on: fail_on.to_vec(),
                ..Default::default()
            }
        }

        fn databases(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl QueryExecutor for FakeExecutor {
        async fn execute(
            &self,
            _query: Query,
            database: Option<&str>,
        ) -> std::result::Result<QueryResult, GraphError> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(database.map(str::to_string));
                calls.len() - 1
            };
            if self.fail_on.contains(&index) {
                Err(GraphError::Connection(format!("call {index} rejected")))
            } else {
                Ok(QueryResult::default())
            }
        }
    }

    fn plan() -> SeedPlan {
        SeedPlan::classroom("https://example.test", "graphdb")
    }

    #[tokio::test]
    async fn test_runs_every_step_on_plan_database() {
        let executor = FakeExecutor::default();
        let report = run_plan(&executor, &plan(), RunOptions::default()).await;

        assert_eq!(report.steps.len(), 12);
        assert_eq!(report.succeeded(), 12);
        assert!(report.is_success());
        assert!(report.ensure_success().is_ok());
        assert_eq!(
            executor.databases(),
            vec![Some("graphdb".to_string()); 12]
        );
    }

    #[tokio::test]
    async fn test_continues_past_failures_by_default() {
        let executor = FakeExecutor::failing(&[1, 8]);
        let report = run_plan(&executor, &plan(), RunOptions::default()).await;

        assert_eq!(executor.databases().len(), 12);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.succeeded(), 10);
        assert_eq!(report.skipped(), 0);
        assert_eq!(
            report.steps[1].outcome,
            StepOutcome::Failed {
                reason: "Neo4j connection error: call 1 rejected".to_string()
            }
        );
        assert_eq!(report.steps[8].name, "link-window-desk-door");
    }

    #[tokio::test]
    async fn test_strict_skips_after_first_failure() {
        let executor = FakeExecutor::failing(&[2]);
        let options = RunOptions {
            strict: true,
            swallow_errors: false,
        };
        let report = run_plan(&executor, &plan(), options).await;

        assert_eq!(executor.databases().len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 9);
        assert_eq!(report.steps.len(), 12);
        assert!(report.steps[3..]
            .iter()
            .all(|s| s.outcome == StepOutcome::Skipped));

        let err = report.ensure_success().unwrap_err();
        assert!(err.to_string().starts_with("Seed step load-windows failed"));
    }

    #[tokio::test]
    async fn test_swallow_errors_masks_failures() {
        let executor = FakeExecutor::failing(&[0, 5, 11]);
        let options = RunOptions {
            strict: true,
            swallow_errors: true,
        };
        let report = run_plan(&executor, &plan(), options).await;

        assert_eq!(executor.databases().len(), 12);
        assert_eq!(report.failed(), 0);
        assert!(report
            .steps
            .iter()
            .all(|s| s.outcome == StepOutcome::Succeeded { rows: 0 }));
    }

    #[tokio::test]
    async fn test_report_keeps_step_kinds() {
        let executor = FakeExecutor::default();
        let selected = plan()
            .select(&["load-doors".to_string(), "link-chairs-behind-tables".to_string()])
            .unwrap();
        let report = run_plan(&executor, &selected, RunOptions::default()).await;

        let kinds: Vec<StepKind> = report.steps.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::NodeLoad, StepKind::Relationship]);
        assert_eq!(report.database, "graphdb");
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = Settings::default();
        settings.seed.strict = true;
        settings.neo4j.swallow_errors = true;

        let options = RunOptions::from(&settings);
        assert!(options.strict);
        assert!(options.swallow_errors);
    }
}
