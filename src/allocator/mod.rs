//! Duty allocation and roster statistics.
//!
//! # Algorithm
//!
//! `DutyAllocator` seats one special member per room and slot, rotating
//! through the special members round-robin, and tops each room up to the
//! requested headcount with general members consumed once each in shuffled
//! order. Rooms may end up under-filled when general members run out.
//!
//! # Summary
//!
//! `RosterSummary` reports totals, fill levels and unused members.

mod duty;
mod summary;

pub use duty::{AllocationRequest, DutyAllocator};
pub use summary::RosterSummary;
