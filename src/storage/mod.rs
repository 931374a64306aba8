pub mod db;
mod forms;
pub mod models;
mod notifications;
mod placements;
mod sessions;
mod tables;
mod users;

pub use db::{Database, DatabaseError};
pub use placements::PlacementUpdate;
