//! Duty roster generation.
//!
//! Assigns members to rooms across timing slots: every room gets one
//! special member per slot (rotated round-robin) and is topped up to the
//! requested headcount with general members, each used at most once.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Member`, `Room`, `TimingSlot`,
//!   `Assignment`, `Roster`
//! - **`validation`**: Request preconditions and record checks
//! - **`allocator`**: `DutyAllocator` and `RosterSummary`
//! - **`grouping`**: `date -> time -> block` reshaping for display
//! - **`store`**: JSON file storage of members, rooms and slots
//! - **`registry`**: Validated edits over the stored collections
//! - **`config`**: Defaults, config file and environment overrides
//!
//! # Randomness
//!
//! The only source of variation is the initial member shuffle. The
//! allocator takes any `rand::Rng`, so seeded generators give reproducible
//! rosters; `DutyAllocator::allocate_in_order` skips the shuffle entirely.

pub mod allocator;
pub mod config;
pub mod error;
pub mod grouping;
pub mod models;
pub mod registry;
pub mod store;
pub mod validation;

pub use error::{Result, RosterError};
