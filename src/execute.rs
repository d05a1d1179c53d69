//! Running extracted statements against a database.
//!
//! The scanner only produces statement texts. Anything that can run a single
//! statement implements [`StatementExecutor`]; [`run_script`] feeds it the
//! statements of a script strictly in source order and records what happened.
use crate::*;
use itertools::Itertools as _;
use sqlx::{
    AssertSqlSafe, Column as _, Executor as _, PgPool, SqlSafeStr as _, Statement as _,
    postgres::PgPoolOptions,
};
use std::time::{Duration, Instant};

/// What a single statement did.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Outcome {
    /// The statement produced a result set.
    #[display("{count} row(s) [{}]", columns.iter().join(", "))]
    Rows { columns: Vec<String>, count: usize },
    /// The statement changed (or did not touch) rows.
    #[display("{_0} row(s) affected")]
    Affected(u64),
}

/// Executes one literal statement; no parameters are bound.
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    async fn execute(&self, sql: &str) -> Result<Outcome>;
}

/// Result of one statement within a script run.
#[derive(Debug)]
pub struct Executed {
    pub statement: Statement,
    pub outcome: std::result::Result<Outcome, String>,
    pub elapsed: Duration,
}

/// Per-statement results of a script run, in source order.
#[derive(Debug, Default)]
pub struct Report {
    pub executed: Vec<Executed>,
    /// Statements that were extracted but never run because an earlier one failed.
    pub skipped: usize,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &Executed> {
        self.executed.iter().filter(|e| e.outcome.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.skipped == 0 && self.failures().next().is_none()
    }

    pub fn elapsed(&self) -> Duration {
        self.executed.iter().map(|e| e.elapsed).sum()
    }
}

/// Extract the statements of `script` and execute them one after another.
///
/// With `stop_on_error` the run ends at the first failing statement and the
/// remaining ones are counted as skipped; otherwise every statement is tried.
pub async fn run_script<E: StatementExecutor>(
    executor: &E,
    script: &str,
    stop_on_error: bool,
) -> Report {
    let statements = extract(script);
    let total = statements.len();
    let mut report = Report::default();

    for (idx, statement) in statements.into_iter().enumerate() {
        let started = Instant::now();
        let outcome = executor
            .execute(statement.text())
            .await
            .map_err(|e| e.to_string());
        let elapsed = started.elapsed();
        let failed = outcome.is_err();

        match &outcome {
            Ok(outcome) => info!("Statement {}/{total} ok in {elapsed:.2?}: {outcome}", idx + 1),
            Err(e) => warn!("Statement {}/{total} failed in {elapsed:.2?}: {e}", idx + 1),
        }
        report.executed.push(Executed {
            statement,
            outcome,
            elapsed,
        });

        if failed && stop_on_error {
            report.skipped = total - idx - 1;
            break;
        }
    }
    report
}

/// [`StatementExecutor`] over a PostgreSQL pool.
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl StatementExecutor for PgExecutor {
    async fn execute(&self, sql: &str) -> Result<Outcome> {
        let prepared = self
            .pool
            .prepare(AssertSqlSafe(sql.to_owned()).into_sql_str())
            .await?;
        let columns = prepared
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();

        if columns.is_empty() {
            let done = prepared.query().execute(&self.pool).await?;
            Ok(Outcome::Affected(done.rows_affected()))
        } else {
            let rows = prepared.query().fetch_all(&self.pool).await?;
            Ok(Outcome::Rows {
                columns,
                count: rows.len(),
            })
        }
    }
}
