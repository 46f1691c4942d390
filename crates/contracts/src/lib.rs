//! Shared contracts between the station dashboard frontend and the admin API.
//!
//! DTO definitions live under `projections`, pure computation shared by both
//! sides (the sales query engine) lives under `shared`.

pub mod projections;
pub mod shared;
