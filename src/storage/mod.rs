use crate::error::{JujuError, Result};
use crate::store::Conversation;
use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

/// Snapshot key holding the serialized conversation list
const KEY_CONVERSATIONS: &str = "conversations";
/// Snapshot key holding the active conversation id
const KEY_ACTIVE_ID: &str = "active_conversation_id";

/// Key-value snapshot storage for conversation state
///
/// Backed by a single SQLite table with two entries: the full conversation
/// list as a JSON array, and the active conversation id as a plain string.
/// Both entries are replaced together on every write.
pub struct SnapshotStorage {
    db_path: PathBuf,
}

impl SnapshotStorage {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory.
    pub fn new() -> Result<Self> {
        // Allow override of the snapshot DB path via environment variable.
        // This makes it easy to point the binary at a test DB or alternate file
        // without changing the user's application data dir.
        if let Ok(override_path) = std::env::var("JUJUCHAT_SNAPSHOT_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "jujuchat", "jujuchat")
            .ok_or_else(|| JujuError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| JujuError::Storage(e.to_string()))?;

        let db_path = data_dir.join("snapshot.db");
        let storage = Self { db_path };

        storage.init()?;

        Ok(storage)
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::storage::SnapshotStorage;
    ///
    /// let storage = SnapshotStorage::new_with_path("/tmp/test_snapshot.db").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the DB file succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| JujuError::Storage(e.to_string()))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshot (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create snapshot table")
        .map_err(|e| JujuError::Storage(e.to_string()))?;

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| JujuError::Storage(e.to_string()).into())
    }

    fn read_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.open()?;

        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM snapshot WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read snapshot entry")
            .map_err(|e| JujuError::Storage(e.to_string()))?;

        Ok(value)
    }

    /// Read the persisted conversation list
    ///
    /// Returns `Ok(None)` when no snapshot has been written yet or when the
    /// stored JSON does not parse; the caller treats both as a fresh start.
    pub fn read_conversations(&self) -> Result<Option<Vec<Conversation>>> {
        let Some(raw) = self.read_value(KEY_CONVERSATIONS)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(conversations) => Ok(Some(conversations)),
            Err(e) => {
                tracing::warn!("Persisted conversations are not valid JSON: {}", e);
                Ok(None)
            }
        }
    }

    /// Read the persisted active conversation id
    pub fn read_active_id(&self) -> Result<Option<String>> {
        self.read_value(KEY_ACTIVE_ID)
    }

    /// Replace the full snapshot in a single transaction
    pub fn write_snapshot(&self, conversations: &[Conversation], active_id: &str) -> Result<()> {
        let json = serde_json::to_string(conversations)
            .context("Failed to serialize conversations")
            .map_err(|e| JujuError::Storage(e.to_string()))?;

        let mut conn = self.open()?;

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| JujuError::Storage(e.to_string()))?;

        tx.execute(
            "INSERT INTO snapshot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![KEY_CONVERSATIONS, json],
        )
        .context("Failed to write conversations")
        .map_err(|e| JujuError::Storage(e.to_string()))?;

        tx.execute(
            "INSERT INTO snapshot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![KEY_ACTIVE_ID, active_id],
        )
        .context("Failed to write active conversation id")
        .map_err(|e| JujuError::Storage(e.to_string()))?;

        tx.commit()
            .context("Failed to commit snapshot")
            .map_err(|e| JujuError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Write a raw value under a snapshot key
    ///
    /// Bypasses serialization; used by tests to simulate corrupt snapshots.
    pub fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "INSERT INTO snapshot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .context("Failed to write snapshot entry")
        .map_err(|e| JujuError::Storage(e.to_string()))?;

        Ok(())
    }
}
