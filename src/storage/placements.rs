use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::Placement;
use super::tables::PLACEMENTS;

/// The faculty-editable field subset of a placement. Poster identity, id and
/// posted_at are not part of it and survive every update.
#[derive(Debug, Clone)]
pub struct PlacementUpdate {
    pub company_name: String,
    pub job_role: String,
    pub package: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    pub eligible_departments: Vec<String>,
    pub job_description: String,
    pub requirements: String,
    pub application_link: String,
}

impl Database {
    // ========================================================================
    // Placement operations
    // ========================================================================

    /// Store a placement posting
    pub fn put_placement(&self, placement: &Placement) -> Result<(), DatabaseError> {
        debug_assert!(!placement.id.is_empty(), "placement id must not be empty");
        debug_assert!(
            !placement.eligible_departments.is_empty(),
            "eligible_departments must not be empty"
        );

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(PLACEMENTS)?;
            let data = rmp_serde::to_vec_named(placement)?;
            table.insert(placement.id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a placement by its UUID
    pub fn get_placement(&self, id: &str) -> Result<Option<Placement>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PLACEMENTS)?;

        match table.get(id)? {
            Some(data) => {
                let placement: Placement = rmp_serde::from_slice(data.value())?;
                Ok(Some(placement))
            }
            None => Ok(None),
        }
    }

    /// All placements, newest posting first
    pub fn list_placements(&self) -> Result<Vec<Placement>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PLACEMENTS)?;

        let mut placements = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let placement: Placement = rmp_serde::from_slice(value.value())?;
            placements.push(placement);
        }

        placements.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(placements)
    }

    /// Overwrite the editable field subset of a placement
    pub fn update_placement(
        &self,
        id: &str,
        update: &PlacementUpdate,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(PLACEMENTS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let placement: Placement = rmp_serde::from_slice(data.value())?;
                    Some(placement)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut placement) => {
                placement.company_name = update.company_name.clone();
                placement.job_role = update.job_role.clone();
                placement.package = update.package.clone();
                placement.location = update.location.clone();
                placement.deadline = update.deadline;
                placement.eligible_departments = update.eligible_departments.clone();
                placement.job_description = update.job_description.clone();
                placement.requirements = update.requirements.clone();
                placement.application_link = update.application_link.clone();

                let serialized = rmp_serde::to_vec_named(&placement)?;
                let mut table = write_txn.open_table(PLACEMENTS)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a placement. Returns false when it was already gone, which a
    /// caller racing the expiry sweep must tolerate.
    pub fn delete_placement(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(PLACEMENTS)?;
            let existed = table.remove(id)?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
