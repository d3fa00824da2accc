//! Embedded PostgreSQL helpers for integration tests.
//!
//! One cluster is shared by every test in a binary. A template database is
//! migrated once per migration set (keyed by a hash of `migrations/`) and
//! each test gets a throwaway clone of it, so suites never see each other's
//! rows and never depend on an externally provisioned server.
//!
//! Setup failures panic: a missing cluster is a broken environment, not a
//! reason to skip.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use account_service::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "accounts_template";
const CLUSTER_RETRIES: usize = 5;
const PROVISION_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated, empty database plus a pool and runtime to drive it.
///
/// The database is dropped together with this value.
pub struct TestDatabase {
    /// Runtime used to block on async repository calls.
    pub runtime: Runtime,
    /// Pool connected to the cloned database.
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(_) if attempt < CLUSTER_RETRIES => {
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("start embedded postgres: {error:?}")),
        }
    }
}

/// Create the template database on first use and bring it up to date.
fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }

    Ok(template_name)
}

fn clone_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no attempt made");
    for attempt in 1..=PROVISION_RETRIES {
        let cloned = ensure_template_database(cluster, runtime).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match cloned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        std::thread::sleep(RETRY_DELAY);
    }
    Err(last_error)
}

/// Provision a fresh migrated database on the shared embedded cluster.
///
/// # Panics
///
/// Panics when the cluster cannot start or the database cannot be created.
pub fn provision_test_database() -> TestDatabase {
    let runtime = Runtime::new().expect("tokio runtime");
    let cluster = shared_cluster().unwrap_or_else(|reason| panic!("{reason}"));
    let database = clone_template(cluster, &runtime).unwrap_or_else(|reason| panic!("{reason}"));
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(database.url()).with_max_size(4)))
        .expect("pool builds");

    TestDatabase {
        runtime,
        pool,
        _database: database,
    }
}
