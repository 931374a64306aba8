use redb::TableDefinition;

/// User records: uuid -> User (msgpack)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Email index: email -> user uuid (login lookup + uniqueness)
pub const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Login sessions: token -> Session (msgpack)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Placement postings: uuid -> Placement (msgpack)
pub const PLACEMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("placements");

/// Notifications: uuid -> Notification (msgpack)
pub const NOTIFICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("notifications");

/// Recipient index: user uuid -> msgpack Vec of notification UUIDs
pub const USER_NOTIFICATIONS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("user_notifications");

/// Application forms: uuid -> ApplicationForm (msgpack)
pub const APPLICATION_FORMS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("application_forms");

/// Submitter index: student uuid -> msgpack Vec of form UUIDs
pub const STUDENT_FORMS: TableDefinition<&str, &[u8]> = TableDefinition::new("student_forms");
