use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::Notification;
use super::tables::*;

impl Database {
    // ========================================================================
    // Notification operations
    // ========================================================================

    /// Store a notification and update the recipient index
    pub fn put_notification(&self, notification: &Notification) -> Result<(), DatabaseError> {
        debug_assert!(
            !notification.id.is_empty(),
            "notification id must not be empty"
        );

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(NOTIFICATIONS)?;
            let data = rmp_serde::to_vec_named(notification)?;
            table.insert(notification.id.as_str(), data.as_slice())?;

            // Maintain recipient index
            let mut user_table = write_txn.open_table(USER_NOTIFICATIONS)?;
            let mut ids: Vec<String> = user_table
                .get(notification.user_id.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()).unwrap_or_default())
                .unwrap_or_default();

            if !ids.contains(&notification.id) {
                ids.push(notification.id.clone());
                let index_data = rmp_serde::to_vec_named(&ids)?;
                user_table.insert(notification.user_id.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a notification by its UUID
    pub fn get_notification(&self, id: &str) -> Result<Option<Notification>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS)?;

        match table.get(id)? {
            Some(data) => {
                let notification: Notification = rmp_serde::from_slice(data.value())?;
                Ok(Some(notification))
            }
            None => Ok(None),
        }
    }

    /// All notifications for a recipient, newest first
    pub fn notifications_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let user_table = read_txn.open_table(USER_NOTIFICATIONS)?;
        let notifications_table = read_txn.open_table(NOTIFICATIONS)?;

        let ids: Vec<String> = match user_table.get(user_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut notifications = Vec::new();
        for id in ids {
            if let Some(data) = notifications_table.get(id.as_str())? {
                let notification: Notification = rmp_serde::from_slice(data.value())?;
                notifications.push(notification);
            }
        }

        notifications.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(notifications)
    }

    /// All notifications referencing a placement (fan-out bookkeeping)
    pub fn notifications_for_placement(
        &self,
        placement_id: &str,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS)?;

        let mut notifications = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let notification: Notification = rmp_serde::from_slice(value.value())?;
            if notification.placement_id == placement_id {
                notifications.push(notification);
            }
        }

        Ok(notifications)
    }

    /// Record the email delivery outcome on a notification. This is the only
    /// mutation a notification ever sees.
    pub fn record_email_outcome(
        &self,
        id: &str,
        sent: bool,
        error: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(NOTIFICATIONS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let notification: Notification = rmp_serde::from_slice(data.value())?;
                    Some(notification)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut notification) => {
                notification.email_sent = Some(sent);
                notification.email_error = error.map(|e| e.to_string());
                notification.email_sent_at = Some(at);

                let serialized = rmp_serde::to_vec_named(&notification)?;
                let mut table = write_txn.open_table(NOTIFICATIONS)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }
}
