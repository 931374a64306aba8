use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{ApplicationForm, EligibilityStatus, InterviewStatus};
use super::tables::*;

impl Database {
    // ========================================================================
    // Application form operations
    // ========================================================================

    /// Store an application form and update the submitter index
    pub fn put_form(&self, form: &ApplicationForm) -> Result<(), DatabaseError> {
        debug_assert!(!form.id.is_empty(), "form id must not be empty");
        debug_assert!(!form.student_id.is_empty(), "student id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(APPLICATION_FORMS)?;
            let data = rmp_serde::to_vec_named(form)?;
            table.insert(form.id.as_str(), data.as_slice())?;

            // Maintain submitter index
            let mut student_table = write_txn.open_table(STUDENT_FORMS)?;
            let mut ids: Vec<String> = student_table
                .get(form.student_id.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()).unwrap_or_default())
                .unwrap_or_default();

            if !ids.contains(&form.id) {
                ids.push(form.id.clone());
                let index_data = rmp_serde::to_vec_named(&ids)?;
                student_table.insert(form.student_id.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a form by its UUID
    pub fn get_form(&self, id: &str) -> Result<Option<ApplicationForm>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(APPLICATION_FORMS)?;

        match table.get(id)? {
            Some(data) => {
                let form: ApplicationForm = rmp_serde::from_slice(data.value())?;
                Ok(Some(form))
            }
            None => Ok(None),
        }
    }

    /// All forms submitted by a student, newest first
    pub fn forms_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<ApplicationForm>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let student_table = read_txn.open_table(STUDENT_FORMS)?;
        let forms_table = read_txn.open_table(APPLICATION_FORMS)?;

        let ids: Vec<String> = match student_table.get(student_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut forms = Vec::new();
        for id in ids {
            if let Some(data) = forms_table.get(id.as_str())? {
                let form: ApplicationForm = rmp_serde::from_slice(data.value())?;
                forms.push(form);
            }
        }

        forms.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(forms)
    }

    /// All forms, newest first, with an optional exact company filter
    pub fn list_forms(&self, company: Option<&str>) -> Result<Vec<ApplicationForm>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(APPLICATION_FORMS)?;

        let mut forms = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let form: ApplicationForm = rmp_serde::from_slice(value.value())?;
            if let Some(company) = company {
                if form.company_name != company {
                    continue;
                }
            }
            forms.push(form);
        }

        forms.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(forms)
    }

    /// Faculty verdict: eligibility. Unconditional, last write wins.
    pub fn set_form_eligibility(
        &self,
        id: &str,
        status: EligibilityStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        self.mutate_form(id, |form| {
            form.eligibility_status = Some(status);
            form.faculty_updated_at = Some(at);
        })
    }

    /// Faculty verdict: interview outcome. Unconditional, last write wins.
    pub fn set_form_interview_status(
        &self,
        id: &str,
        status: InterviewStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        self.mutate_form(id, |form| {
            form.interview_status = Some(status);
            form.faculty_updated_at = Some(at);
        })
    }

    /// Faculty feedback notes, visible to the owning student.
    pub fn set_form_faculty_notes(
        &self,
        id: &str,
        notes: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        self.mutate_form(id, |form| {
            form.faculty_notes = Some(notes.to_string());
            form.faculty_updated_at = Some(at);
        })
    }

    /// Read-modify-write of the faculty-owned fields. Student-identity fields
    /// never pass through here.
    fn mutate_form<F>(&self, id: &str, mutate: F) -> Result<bool, DatabaseError>
    where
        F: FnOnce(&mut ApplicationForm),
    {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(APPLICATION_FORMS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let form: ApplicationForm = rmp_serde::from_slice(data.value())?;
                    Some(form)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut form) => {
                mutate(&mut form);

                let serialized = rmp_serde::to_vec_named(&form)?;
                let mut table = write_txn.open_table(APPLICATION_FORMS)?;
                table.insert(id, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }
}
