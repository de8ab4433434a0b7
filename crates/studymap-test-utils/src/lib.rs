//! Shared PostgreSQL plumbing for studymap integration tests.
//!
//! One server is shared per test binary; every test creates and drops its
//! own database inside it, so tests stay isolated without paying the
//! container startup cost each time.
//!
//! Set `STUDYMAP_TEST_PG_URL` to point the tests at an already-running
//! server (CI does this); otherwise a testcontainers instance is started
//! lazily on first use.

use sqlx::{Connection, Executor, PgConnection, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use studymap_db::DbConfig;
use studymap_db::pool;

struct PgServer {
    url: String,
    /// Keeps the container alive for the life of the test binary. `None`
    /// when `STUDYMAP_TEST_PG_URL` points at an external server.
    _keepalive: Option<ContainerAsync<Postgres>>,
}

static PG_SERVER: OnceCell<PgServer> = OnceCell::const_new();

async fn start_pg_server() -> PgServer {
    if let Ok(url) = std::env::var("STUDYMAP_TEST_PG_URL") {
        return PgServer {
            url,
            _keepalive: None,
        };
    }

    let container = Postgres::default()
        .with_tag("18")
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    PgServer {
        url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _keepalive: Some(container),
    }
}

/// Server-root URL of the shared PostgreSQL instance, with no database
/// name appended.
pub async fn pg_url() -> &'static str {
    &PG_SERVER.get_or_init(start_pg_server).await.url
}

/// Create a uniquely-named, fully-migrated database on the shared server.
///
/// Goes through the same bootstrap path production uses, so the tests also
/// cover `ensure_database_exists` and the embedded migrator. Pass the
/// returned name to [`drop_test_db`] when done.
pub async fn create_test_db() -> (PgPool, String) {
    let db_name = format!("studymap_test_{}", Uuid::new_v4().simple());
    let config = DbConfig::new(format!("{}/{db_name}", pg_url().await));

    pool::ensure_database_exists(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to create test database {db_name}: {e:#}"));

    let db_pool = pool::create_pool(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to test database {db_name}: {e:#}"));

    pool::run_migrations(&db_pool)
        .await
        .expect("migrations should apply cleanly");

    (db_pool, db_name)
}

/// Drop a test database, kicking out any connections still attached to it.
/// Safe to call when the database is already gone.
pub async fn drop_test_db(db_name: &str) {
    let admin_url = format!("{}/postgres", pg_url().await);
    let mut conn = PgConnection::connect(&admin_url)
        .await
        .expect("failed to connect for test database cleanup");

    let stmt = format!("DROP DATABASE IF EXISTS {db_name} WITH (FORCE)");
    let _ = conn.execute(stmt.as_str()).await;
    let _ = conn.close().await;
}
