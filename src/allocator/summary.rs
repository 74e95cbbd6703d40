//! Roster statistics.
//!
//! Computes dashboard totals and fill levels from a finished roster and the
//! inputs it was allocated from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Pairs | slots × rooms |
//! | Underfilled pairs | pairs seated below the requested headcount |
//! | General used | distinct general members seated |
//! | Unused members | general members not seated anywhere |

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Member, Room, Roster, TimingSlot};

/// Roster performance indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    /// Members available to the run.
    pub total_members: usize,
    /// Rooms available to the run.
    pub total_rooms: usize,
    /// Slots available to the run.
    pub total_slots: usize,
    /// Number of (slot, room) pairs.
    pub pairs: usize,
    /// Total assignments produced.
    pub assignments: usize,
    /// Assignments held by special members.
    pub special_assignments: usize,
    /// Assignments held by general members.
    pub general_assignments: usize,
    /// Pairs seated below `per_room`.
    pub underfilled_pairs: usize,
    /// Distinct general members seated.
    pub general_used: usize,
    /// IDs of general members left unseated, in input order.
    pub unused_members: Vec<String>,
}

impl RosterSummary {
    /// Computes the summary of a roster.
    ///
    /// # Arguments
    /// * `roster` - The allocated roster.
    /// * `members`, `rooms`, `timings` - The allocation inputs.
    /// * `per_room` - The requested headcount.
    pub fn calculate(
        roster: &Roster,
        members: &[Member],
        rooms: &[Room],
        timings: &[TimingSlot],
        per_room: usize,
    ) -> Self {
        let mut seated_per_pair: HashMap<(&Room, &TimingSlot), usize> = HashMap::new();
        let mut general_seated: HashSet<&str> = HashSet::new();

        for a in roster {
            *seated_per_pair.entry((&a.room, &a.timing)).or_insert(0) += 1;
            if !a.is_special() {
                general_seated.insert(a.member.id.as_str());
            }
        }

        let mut underfilled = 0;
        for timing in timings {
            for room in rooms {
                let seated = seated_per_pair.get(&(room, timing)).copied().unwrap_or(0);
                if seated < per_room {
                    underfilled += 1;
                }
            }
        }

        let unused_members = members
            .iter()
            .filter(|m| m.is_general() && !general_seated.contains(m.id.as_str()))
            .map(|m| m.id.clone())
            .collect();

        let special_assignments = roster.special_count();

        Self {
            total_members: members.len(),
            total_rooms: rooms.len(),
            total_slots: timings.len(),
            pairs: rooms.len() * timings.len(),
            assignments: roster.assignment_count(),
            special_assignments,
            general_assignments: roster.assignment_count() - special_assignments,
            underfilled_pairs: underfilled,
            general_used: general_seated.len(),
            unused_members,
        }
    }

    /// Whether every pair reached the requested headcount.
    pub fn is_fully_staffed(&self) -> bool {
        self.underfilled_pairs == 0
    }
}
