//! Notification fan-out for new placement postings.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::eligibility;
use crate::mailer::{placement_summary, Mailer};
use crate::storage::models::{Notification, Placement};
use crate::storage::{Database, DatabaseError};

/// Aggregate dispatch outcome of one fan-out run.
/// `sent + failed` equals the number of eligible students processed.
#[derive(Debug, Default, Serialize)]
pub struct FanOutReport {
    pub sent: u32,
    pub failed: u32,
}

/// Notify every eligible student about a newly created placement.
///
/// For each student whose department the posting targets: persist a
/// notification record (read=false), attempt one email send, and record the
/// delivery outcome on the record. A failure for one student never aborts
/// the rest of the run; there is no transaction or rollback, so a mid-run
/// failure leaves an observable partial fan-out. Sends are strictly
/// sequential with `send_delay` between attempts to respect the dispatch
/// provider's rate limit.
pub async fn notify_eligible_students(
    db: &Database,
    mailer: &dyn Mailer,
    placement: &Placement,
    send_delay: Duration,
) -> Result<FanOutReport, DatabaseError> {
    let students = db.list_students()?;
    debug!(
        placement_id = %placement.id,
        company = %placement.company_name,
        total_students = students.len(),
        "Starting notification fan-out"
    );

    let mut report = FanOutReport::default();

    for student in &students {
        if !eligibility::is_eligible(&placement.eligible_departments, &student.department) {
            debug!(student_id = %student.id, department = %student.department, "Skipped (not eligible)");
            continue;
        }

        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: student.id.clone(),
            user_email: student.email.clone(),
            kind: "placement".to_string(),
            placement_id: placement.id.clone(),
            company_name: placement.company_name.clone(),
            job_role: placement.job_role.clone(),
            message: placement_summary(placement),
            sent_at: Utc::now(),
            read: false,
            email_sent: None,
            email_error: None,
            email_sent_at: None,
        };

        if let Err(e) = db.put_notification(&notification) {
            warn!(student_id = %student.id, error = %e, "Failed to write notification");
            report.failed += 1;
            continue;
        }

        match mailer.send(student, placement).await {
            Ok(()) => {
                report.sent += 1;
                debug!(email = %student.email, "Email sent");
                record_outcome(db, &notification.id, true, None);
            }
            Err(e) => {
                report.failed += 1;
                warn!(email = %student.email, error = %e, "Email dispatch failed");
                record_outcome(db, &notification.id, false, Some(&e.to_string()));
            }
        }

        if !send_delay.is_zero() {
            tokio::time::sleep(send_delay).await;
        }
    }

    debug!(
        placement_id = %placement.id,
        sent = report.sent,
        failed = report.failed,
        "Notification fan-out complete"
    );
    Ok(report)
}

fn record_outcome(db: &Database, notification_id: &str, sent: bool, error: Option<&str>) {
    if let Err(e) = db.record_email_outcome(notification_id, sent, error, Utc::now()) {
        warn!(notification_id, error = %e, "Failed to record email outcome");
    }
}
