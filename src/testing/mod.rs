#![cfg(test)]
crate::reexport!(container);
crate::reexport!(context);
pub use rstest::*;

/// Install the tracing subscriber once for the whole test binary.
pub(crate) fn common_init() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env()) // RUST_LOG
            .with_test_writer()
            .init();
    });
}

mod isolated_integration_tests {
    use super::{super::*, *};

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn lands_in_own_database(ctx: &mut IsolatedIntegrationTest) -> Result {
        let database: String = sqlx::query_scalar("SELECT current_database();")
            .fetch_one(&ctx.pool)
            .await?;
        assert_eq!(ctx.database, database);
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[rstest]
    #[case("CREATE TEMP TABLE t (a INT); INSERT INTO t VALUES (1); SELECT a FROM t", 3)]
    #[case("SET search_path TO public; SELECT 1; -- done", 2)]
    #[tokio::test]
    async fn scripts_share_a_session(
        ctx: &mut IsolatedIntegrationTest,
        #[case] script: &'static str,
        #[case] statements: usize,
    ) {
        let executor = PgExecutor::new(ctx.pool.clone());
        let report = run_script(&executor, script, true).await;
        assert!(report.is_success(), "{report:?}");
        assert_eq!(report.executed.len(), statements);
    }
}
