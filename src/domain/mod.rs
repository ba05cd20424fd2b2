//! Domain models shared between routes and services.

pub mod contacts;
pub mod health;
