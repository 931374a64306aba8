use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{Role, User};
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Store a user record and update the email index
    pub fn put_user(&self, user: &User) -> Result<(), DatabaseError> {
        debug_assert!(!user.id.is_empty(), "user id must not be empty");
        debug_assert!(!user.email.is_empty(), "user email must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            let data = rmp_serde::to_vec_named(user)?;
            table.insert(user.id.as_str(), data.as_slice())?;

            let mut email_table = write_txn.open_table(USER_EMAILS)?;
            email_table.insert(user.email.as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by its UUID
    pub fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(id)? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Get a user by email (resolves email -> uuid -> user)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let email_table = read_txn.open_table(USER_EMAILS)?;

        let id = match email_table.get(email)? {
            Some(data) => data.value().to_string(),
            None => return Ok(None),
        };

        let users_table = read_txn.open_table(USERS)?;
        match users_table.get(id.as_str())? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Check if an email is already registered
    pub fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USER_EMAILS)?;
        Ok(table.get(email)?.is_some())
    }

    /// All users with the student role, sorted by name
    pub fn list_students(&self) -> Result<Vec<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut students = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let user: User = rmp_serde::from_slice(value.value())?;
            if user.role == Role::Student {
                students.push(user);
            }
        }

        students.sort_by(|a, b| {
            a.full_name
                .to_lowercase()
                .cmp(&b.full_name.to_lowercase())
        });
        Ok(students)
    }

    /// Update a user's self-service profile fields
    pub fn update_profile(
        &self,
        id: &str,
        full_name: &str,
        phone: &str,
        department: &str,
        year: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(USERS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let user: User = rmp_serde::from_slice(data.value())?;
                    Some(user)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut user) => {
                user.full_name = full_name.to_string();
                user.phone = phone.to_string();
                user.department = department.to_string();
                if let Some(year) = year {
                    user.year = Some(year.to_string());
                }

                let serialized = rmp_serde::to_vec_named(&user)?;
                let mut table = write_txn.open_table(USERS)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Record a freshly uploaded resume on the user record
    pub fn set_resume(
        &self,
        id: &str,
        resume_url: &str,
        resume_filename: &str,
        uploaded_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(USERS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let user: User = rmp_serde::from_slice(data.value())?;
                    Some(user)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut user) => {
                user.resume_url = Some(resume_url.to_string());
                user.resume_filename = Some(resume_filename.to_string());
                user.resume_updated_at = Some(uploaded_at);

                let serialized = rmp_serde::to_vec_named(&user)?;
                let mut table = write_txn.open_table(USERS)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }
}
