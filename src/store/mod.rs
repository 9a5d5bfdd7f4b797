//! Store module - Adattatore verso il database relazionale
//!
//! Espone per ogni tipo di entità una collezione ([`EntitySet`]) che sa
//! inserire, cercare, sostituire ed eliminare righe, più un working set di
//! entità tracciate ([`Tracked`]) le cui modifiche vengono scritte da
//! [`EntitySet::save_changes`].
//!
//! Il pool viene creato da [`connect`], che applica anche le migrations
//! incluse nel binario (schema + seed delle due ville iniziali).

pub mod entity_set;
pub mod tracking;

pub use entity_set::{EntitySet, Filter};
pub use tracking::Tracked;

use crate::core::Config;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::query_builder::Separated;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Encode, FromRow, Sqlite, SqlitePool, Type};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

/// Migrations embedded at compile time from `./migrations`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors surfaced by the store adapter and, unchanged, by the repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] MigrateError),

    /// The row to replace no longer exists.
    #[error("no {table} row with key {key} to update")]
    StaleEntity { table: &'static str, key: String },

    /// A tracked entity was given a different key before the flush.
    #[error("tracked {table} row {tracked} cannot change its key to {current}")]
    KeyChanged {
        table: &'static str,
        tracked: String,
        current: String,
    },

    /// The rowid generated on insert does not fit the entity key.
    #[error("generated rowid {rowid} does not fit the {table} key")]
    KeyOutOfRange { table: &'static str, rowid: i64 },
}

impl StoreError {
    pub fn stale<E: Entity>(key: E::Key) -> Self {
        Self::StaleEntity {
            table: E::TABLE,
            key: key.to_string(),
        }
    }

    pub fn key_changed<E: Entity>(tracked: E::Key, current: E::Key) -> Self {
        Self::KeyChanged {
            table: E::TABLE,
            tracked: tracked.to_string(),
            current: current.to_string(),
        }
    }

    /// true per violazioni di vincoli (FK, unique, not null, check)
    ///
    /// sqlx classifica solo alcuni codici estesi: una FK con `RESTRICT`
    /// (1811) arriva come `ErrorKind::Other`, quindi si guarda anche il
    /// codice primario.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => {
                !matches!(db.kind(), sqlx::error::ErrorKind::Other)
                    || db.code().is_some_and(|code| is_constraint_code(&code))
            }
            _ => false,
        }
    }
}

// SQLITE_CONSTRAINT e tutti i suoi codici estesi
const SQLITE_CONSTRAINT: i32 = 19;

fn is_constraint_code(code: &str) -> bool {
    code.parse::<i32>()
        .is_ok_and(|code| code & 0xff == SQLITE_CONSTRAINT)
}

/// Describes how an entity maps onto its table.
///
/// Column lists use the physical column names; the order of
/// `INSERT_COLUMNS`/`UPDATE_COLUMNS` must match the order in which
/// `push_insert_values`/`push_update_values` bind the values.
pub trait Entity:
    for<'r> FromRow<'r, SqliteRow> + Clone + PartialEq + Debug + Send + Sync + Unpin + 'static
{
    type Key: Copy
        + Eq
        + Hash
        + Debug
        + Display
        + Send
        + Sync
        + 'static
        + for<'q> Encode<'q, Sqlite>
        + Type<Sqlite>;

    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// The key is assigned by the database on insert
    const GENERATED_KEY: bool;
    /// Columns written on insert, key excluded
    const INSERT_COLUMNS: &'static [&'static str];
    /// Columns replaced by an update
    const UPDATE_COLUMNS: &'static [&'static str];

    fn key(&self) -> Self::Key;

    /// Writes back the rowid generated by the store. Only called when
    /// `GENERATED_KEY` is true.
    fn assign_key(&mut self, _rowid: i64) -> Result<(), StoreError> {
        Ok(())
    }

    fn updated_at(&self) -> DateTime<Utc>;

    fn touch(&mut self, at: DateTime<Utc>);

    fn push_insert_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);

    fn push_update_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);
}

/// Timestamp for an update: now, but always strictly after `previous`.
pub fn refreshed_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// Crea il pool SQLite e applica le migrations.
///
/// Con `sqlite::memory:` ogni connessione vede un database diverso: in quel
/// caso va usato `MAX_DB_CONNECTIONS=1`.
#[instrument(skip(config))]
pub async fn connect(config: &Config) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("Database ready, migrations applied");

    Ok(pool)
}
