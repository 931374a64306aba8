use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::Session;
use super::tables::SESSIONS;

impl Database {
    // ========================================================================
    // Session operations
    // ========================================================================

    /// Store a login session keyed by its token
    pub fn put_session(&self, session: &Session) -> Result<(), DatabaseError> {
        debug_assert!(!session.token.is_empty(), "session token must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            let data = rmp_serde::to_vec_named(session)?;
            table.insert(session.token.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Resolve a session token
    pub fn get_session(&self, token: &str) -> Result<Option<Session>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;

        match table.get(token)? {
            Some(data) => {
                let session: Session = rmp_serde::from_slice(data.value())?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Delete a session (logout). Returns false if the token was unknown.
    pub fn delete_session(&self, token: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(SESSIONS)?;
            let existed = table.remove(token)?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
