use crate::*;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::{Duration, Instant};
use testcontainers::{
    ContainerRequest, GenericImage, ImageExt,
    core::{IntoContainerPort as _, WaitFor, logs::LogFrame},
    runners::AsyncRunner as _,
};
use tokio::sync::OnceCell;

pub type Container = testcontainers::ContainerAsync<GenericImage>;

const PG_USER: &str = "postgres";
const PG_PASS: &str = "postgres";
const PG_PORT: u16 = 5432;

/// Shared Postgres container, started on first use.
pub async fn postgres() -> &'static Container {
    static POSTGRES: OnceCell<Container> = OnceCell::const_new();
    const TRIES: u8 = 3;
    POSTGRES
        .get_or_init(|| async {
            for attempt in 1..=TRIES {
                match start().await {
                    Ok(container) => return container,
                    Err(e) => error!("Container start {attempt}/{TRIES} failed: {e:?}"),
                }
            }
            panic!("Postgres container did not start after {TRIES} attempts")
        })
        .await
}

/// Single-connection pool to `database` inside the shared container.
///
/// One connection so that a script's session state (temp tables, `SET`) is
/// visible to every statement that follows.
pub(crate) async fn pool(database: &str) -> PgPool {
    let container = postgres().await;
    let url = format!(
        "postgres://{PG_USER}:{PG_PASS}@{}:{}/{database}",
        container.get_host().await.expect("container host"),
        container
            .get_host_port_ipv4(PG_PORT)
            .await
            .expect("container port")
    );
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("db init connection failure")
}

async fn start() -> std::result::Result<Container, testcontainers::TestcontainersError> {
    debug!("Starting Postgres container");
    let started = Instant::now();
    let container = image().start().await?;
    debug!("Container ready in {:#.2?}", started.elapsed());
    Ok(container)
}

fn image() -> ContainerRequest<GenericImage> {
    let mut image = GenericImage::new("postgres", "16-alpine")
        .with_exposed_port(PG_PORT.tcp())
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_USER", PG_USER)
        .with_env_var("POSTGRES_PASSWORD", PG_PASS)
        .with_env_var("POSTGRES_DB", "postgres");

    if config().container_logs {
        image = image.with_log_consumer(|line: &LogFrame| trace!("[Container Logs] {line:?}"));
    }

    if config().container_ramdisked {
        image = image
            .with_env_var("PGDATA", "/dev/shm/pgdata")
            .with_shm_size(512 * 1024 * 1024);
    }

    image.with_startup_timeout(Duration::from_secs(60))
}
