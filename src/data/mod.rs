//! Data ingestion
//!
//! One loader per per-athlete CSV export, plus shared reading helpers.

pub mod capability;
pub mod gps;
pub mod priority;
pub mod read;
pub mod recovery;

pub use capability::load_physical_capabilities;
pub use gps::load_gps;
pub use priority::load_priority;
pub use recovery::load_recovery_status;
