//! Service layer modules for external integrations and persistence.
//!
//! Contains the completion-provider client, SMS delivery, and the
//! per-user contact store.

pub mod insights;
pub mod sms;
pub mod store;

pub use insights::InsightClient;
pub use sms::{AlertSender, SimulatedSender, TwilioSender};
pub use store::{ContactStore, FileContactStore};
