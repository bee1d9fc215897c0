// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the Chirpy API server.

pub mod hits;

pub use hits::count_hits;
