use crate::testing::*;
use sqlx::PgPool;
use test_context::AsyncTestContext;
pub use test_context::test_context;

/// A freshly created, randomly named database that is dropped after the test.
pub struct IsolatedIntegrationTest {
    pub pool: PgPool,
    pub database: String,
}

impl IsolatedIntegrationTest {
    fn random_name() -> String {
        use rand::Rng;
        let suffix: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        format!("sqlscript_{}", suffix.to_lowercase())
    }
}

impl AsyncTestContext for IsolatedIntegrationTest {
    async fn setup() -> Self {
        crate::testing::common_init();
        let admin = pool("postgres").await;
        let database = Self::random_name();
        sqlx::query(sqlx::AssertSqlSafe(format!("CREATE DATABASE {database}")))
            .execute(&admin)
            .await
            .expect("Failed to create test database");
        admin.close().await;

        Self {
            pool: pool(&database).await,
            database,
        }
    }

    async fn teardown(self) {
        self.pool.close().await;

        let admin = pool("postgres").await;
        sqlx::query(sqlx::AssertSqlSafe(format!(
            "DROP DATABASE {}",
            self.database
        )))
        .execute(&admin)
        .await
        .expect("Failed to drop test database");
        admin.close().await;
    }
}
