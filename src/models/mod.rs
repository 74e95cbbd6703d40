//! Roster domain models.
//!
//! Provides the data types exchanged between storage, the allocator and
//! presentation.
//!
//! # Domain Mappings
//!
//! | u-roster | Exam duty | Hospital | Events |
//! |----------|-----------|----------|--------|
//! | Member | Invigilator | Nurse | Volunteer |
//! | Special member | Senior supervisor | Charge nurse | Team lead |
//! | Room | Exam hall | Ward | Booth |
//! | TimingSlot | Exam session | Shift | Time block |

mod member;
mod room;
mod roster;
mod timing;

pub use member::{title_case, Member};
pub use room::Room;
pub use roster::{Assignment, Roster};
pub use timing::{TimingSlot, CLOCK_FORMAT, DATE_FORMAT};
