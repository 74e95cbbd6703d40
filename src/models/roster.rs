//! Roster (solution) model.
//!
//! A roster is the ordered list of member-room-slot assignments produced by
//! one allocation run. Order follows allocation order: slot-major, then room,
//! then seat within the room. Rosters are recomputed on demand and never
//! persisted.

use serde::{Deserialize, Serialize};

use super::{Member, Room, TimingSlot};

/// A member seated in a room during a timing slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned member.
    pub member: Member,
    /// Room the member sits in.
    pub room: Room,
    /// Duty window.
    pub timing: TimingSlot,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(member: Member, room: Room, timing: TimingSlot) -> Self {
        Self {
            member,
            room,
            timing,
        }
    }

    /// Whether the seated member is special.
    #[inline]
    pub fn is_special(&self) -> bool {
        self.member.special
    }
}

/// A complete roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    /// Assignments in allocation order.
    pub assignments: Vec<Assignment>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Appends a batch of assignments, preserving their order.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Assignment>) {
        self.assignments.extend(batch);
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no assignment was produced.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of assignments held by special members.
    pub fn special_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_special()).count()
    }

    /// All assignments of a member.
    pub fn assignments_for_member(&self, member_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.member.id == member_id)
            .collect()
    }

    /// All assignments in a room, across slots.
    pub fn assignments_for_room(&self, room: &Room) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| &a.room == room).collect()
    }

    /// All assignments of one room during one slot.
    pub fn assignments_at(&self, room: &Room, timing: &TimingSlot) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| &a.room == room && &a.timing == timing)
            .collect()
    }
}

impl IntoIterator for Roster {
    type Item = Assignment;
    type IntoIter = std::vec::IntoIter<Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn morning() -> TimingSlot {
        TimingSlot::new(
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
        )
    }

    fn sample_roster() -> Roster {
        let mut r = Roster::new();
        r.add_assignment(Assignment::new(
            Member::special("S1", "Head"),
            Room::new("A", "1"),
            morning(),
        ));
        r.add_assignment(Assignment::new(
            Member::new("G1", "Asha"),
            Room::new("A", "1"),
            morning(),
        ));
        r.add_assignment(Assignment::new(
            Member::special("S1", "Head"),
            Room::new("A", "2"),
            morning(),
        ));
        r
    }

    #[test]
    fn test_roster_counts() {
        let r = sample_roster();
        assert_eq!(r.assignment_count(), 3);
        assert_eq!(r.special_count(), 2);
        assert!(!r.is_empty());
        assert!(Roster::new().is_empty());
    }

    #[test]
    fn test_assignments_for_member() {
        let r = sample_roster();
        assert_eq!(r.assignments_for_member("S1").len(), 2);
        assert_eq!(r.assignments_for_member("G1").len(), 1);
        assert!(r.assignments_for_member("nobody").is_empty());
    }

    #[test]
    fn test_assignments_for_room_and_slot() {
        let r = sample_roster();
        let a1 = Room::new("A", "1");
        assert_eq!(r.assignments_for_room(&a1).len(), 2);
        assert_eq!(r.assignments_at(&a1, &morning()).len(), 2);
    }

    #[test]
    fn test_roster_serializes_as_plain_list() {
        let json = serde_json::to_value(sample_roster()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["room"]["roomNo"], "1");
    }
}
