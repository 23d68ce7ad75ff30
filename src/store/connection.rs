/*!
 * SQLite handle behind the word repository.
 *
 * Every query runs on tokio's blocking pool and comes back as a
 * [`StoreError`]. Writes run in a single transaction; a failing write
 * leaves the database as it was and is reported as [`StoreError::Batch`],
 * unless the closure already raised a more specific store error.
 */

use anyhow::Context;
use log::{debug, info};
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::StoreError;

use super::schema;

const STORE_DIR: &str = "vocabport";
const STORE_FILE: &str = "vocabport.db";

/// Shared handle to one word database
#[derive(Clone)]
pub struct StoreConnection {
    location: PathBuf,
    inner: Arc<Mutex<Connection>>,
}

impl StoreConnection {
    /// Open the word database under the user's data directory
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_location()?)
    }

    /// Open the word database at `location`, creating the file and schema on first use
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self, StoreError> {
        let location = location.as_ref().to_path_buf();
        info!("Opening word store at {}", location.display());

        let conn = Self::prepare_file(&location).map_err(|e| {
            StoreError::Database(format!("cannot open {}: {:#}", location.display(), e))
        })?;

        Ok(Self::wrap(location, conn))
    }

    /// Private store living only as long as the handle (tests, dry runs)
    pub fn in_memory() -> Result<Self, StoreError> {
        debug!("Opening in-memory word store");

        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn).map_err(|e| StoreError::Database(format!("{:#}", e)))?;

        Ok(Self::wrap(PathBuf::from(":memory:"), conn))
    }

    /// `<data dir>/vocabport/vocabport.db`
    pub fn default_location() -> Result<PathBuf, StoreError> {
        dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .map(|base| base.join(STORE_DIR).join(STORE_FILE))
            .ok_or_else(|| StoreError::Database("no data directory for the word store".to_string()))
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Run a query that changes nothing
    pub async fn read<F, T>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(move |conn| query(conn).map_err(|e| classify(e, StoreError::Database)))
            .await
    }

    /// Run `write` inside one transaction, committing only when it succeeds
    pub async fn write<F, T>(&self, write: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let value = write(&tx).map_err(|e| classify(e, StoreError::Batch))?;
            tx.commit().map_err(|e| StoreError::Batch(e.to_string()))?;
            Ok(value)
        })
        .await
    }

    async fn run<F, T>(&self, job: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || {
            let mut conn = inner
                .lock()
                .map_err(|_| StoreError::Database("word store poisoned by an earlier panic".to_string()))?;
            job(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Database(format!("word store task aborted: {}", e)))?
    }

    fn prepare_file(location: &Path) -> anyhow::Result<Connection> {
        if let Some(dir) = location.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
        }

        let conn = Connection::open(location)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::initialize_schema(&conn)?;
        Ok(conn)
    }

    fn wrap(location: PathBuf, conn: Connection) -> Self {
        Self {
            location,
            inner: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Keeps store errors raised inside a closure, files everything else under `fallback`
fn classify(error: anyhow::Error, fallback: fn(String) -> StoreError) -> StoreError {
    match error.downcast::<StoreError>() {
        Ok(store_error) => store_error,
        Err(other) => fallback(format!("{:#}", other)),
    }
}
