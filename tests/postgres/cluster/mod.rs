//! Embedded `PostgreSQL` cluster shared by the integration tests.
//!
//! One cluster is started per test binary and kept for its lifetime. Each
//! test works in its own database cloned from a migrated template, which is
//! dropped again when the test's [`TemporaryDatabase`] goes out of scope.
//!
//! The cluster runs in process, so the suite must run as an unprivileged
//! user. Under root the fixture panics with a `SKIP-TEST-CLUSTER` message.

mod fs_utils;

use self::env_guard::EnvVarGuard;
use self::fs_utils::{sync_password_from_file, sync_port_from_pid};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::sync::{Mutex, OnceLock, PoisonError};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Error type used throughout the cluster harness.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SHARED_CLUSTER: OnceLock<ManagedCluster> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

pub(crate) fn boxed<E>(err: E) -> BoxError
where
    E: std::error::Error + Send + Sync + 'static,
{
    Box::new(err)
}

/// Managed embedded `PostgreSQL` cluster.
pub struct ManagedCluster {
    settings: Settings,
    _postgres: PostgreSQL,
    _runtime: Runtime,
}

impl ManagedCluster {
    fn new() -> Result<Self, BoxError> {
        let mut bootstrap = bootstrap_for_tests().map_err(boxed)?;
        if matches!(bootstrap.privileges, ExecutionPrivileges::Root) {
            return Err(boxed(std::io::Error::other(
                "embedded PostgreSQL cannot run as root; run the suite as an unprivileged user",
            )));
        }
        sync_password_from_file(&mut bootstrap.settings)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(boxed)?;
        let env_guard = EnvVarGuard::set_many(&bootstrap.environment.to_env());
        let mut postgres = PostgreSQL::new(bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await.map_err(boxed)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await.map_err(boxed)?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(env_guard);

        let mut settings = postgres.settings().clone();
        sync_port_from_pid(&mut settings)?;
        Ok(Self {
            settings,
            _postgres: postgres,
            _runtime: runtime,
        })
    }

    /// Connection URL for a database on this cluster.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.settings.url(database)
    }

    /// Creates `template` and runs `migrate` against its URL, once per cluster.
    ///
    /// A failed migration drops the half-built template so the next caller
    /// starts clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be created or migrated.
    pub fn ensure_template<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let _guard = template_lock();
        if self.database_exists(template)? {
            return Ok(());
        }

        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.execute_admin_sql(&format!("DROP DATABASE {}", quote_identifier(template)))?;
            return Err(err);
        }
        Ok(())
    }

    /// Clones `template` into a uniquely named database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn temporary_database(&'static self, template: &str) -> Result<TemporaryDatabase, BoxError> {
        let name = format!("test_{}", Uuid::new_v4().simple());
        {
            // Concurrent clones of one template are refused by the server.
            let _guard = template_lock();
            self.execute_admin_sql(&format!(
                "CREATE DATABASE {} TEMPLATE {}",
                quote_identifier(&name),
                quote_identifier(template),
            ))?;
        }
        Ok(TemporaryDatabase {
            url: self.database_url(&name),
            name,
            cluster: self,
        })
    }

    fn admin_connection(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.database_url("postgres")).map_err(boxed)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut connection = self.admin_connection()?;
        diesel::sql_query(sql).execute(&mut connection).map_err(boxed)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut connection = self.admin_connection()?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result::<ExistsRow>(&mut connection)
        .map_err(boxed)?;
        Ok(row.exists)
    }
}

/// A database cloned from the template, dropped with the handle.
pub struct TemporaryDatabase {
    name: String,
    url: String,
    cluster: PostgresCluster,
}

impl TemporaryDatabase {
    /// Connection URL for this database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let sql = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        );
        if let Err(err) = self.cluster.execute_admin_sql(&sql) {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Provides the shared `PostgreSQL` test cluster.
#[fixture]
pub fn postgres_cluster() -> PostgresCluster {
    shared_cluster()
}

fn shared_cluster() -> PostgresCluster {
    SHARED_CLUSTER.get_or_init(|| {
        // The bootstrap drives its own runtime, which cannot nest inside the
        // test's runtime.
        let started = std::thread::spawn(ManagedCluster::new)
            .join()
            .unwrap_or_else(|_| Err(boxed(std::io::Error::other("cluster bootstrap panicked"))));
        match started {
            Ok(cluster) => cluster,
            Err(err) => panic!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}"),
        }
    })
}

fn template_lock() -> std::sync::MutexGuard<'static, ()> {
    TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
