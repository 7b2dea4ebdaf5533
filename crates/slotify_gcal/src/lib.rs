// --- File: crates/slotify_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod agenda;
pub mod arbiter;
pub mod auth;
pub mod codec;
#[cfg(test)]
mod codec_proptest;
#[cfg(test)]
mod codec_test;
pub mod doc;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logic;
pub mod memory;
pub mod partition;
#[cfg(test)]
mod partition_proptest;
pub mod reservation;
pub mod routes;
pub mod service;
pub mod store;
pub mod time;

pub use error::SlotError;
pub use logic::SlotEngine;
