//! Domain records and filtering rules of the console.

pub mod context;
pub mod filter;
pub mod listing;
pub mod types;
pub mod user;
