//! Round-robin duty allocator.
//!
//! # Algorithm
//!
//! 1. Shuffle all members, then split them into special and general members
//!    (both keep shuffled order).
//! 2. Walk slots (outer) × rooms (inner) in input order with one general
//!    cursor shared by the whole walk.
//! 3. For pair `(t, r)`, seat `special[(t + r) % specials]` when any special
//!    member exists, then seat general members from the cursor until the
//!    room holds `per_room` members or general members run out.
//!
//! Rooms visited after the general pool is exhausted keep only their special
//! member (or stay empty). This is not an error.
//!
//! # Complexity
//! O(t * r + m) where t=slots, r=rooms, m=members.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Assignment, Member, Room, Roster, TimingSlot};
use crate::validation::{validate_request, ValidationResult};

/// Input container for allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationRequest {
    /// Members to seat.
    pub members: Vec<Member>,
    /// Rooms to fill, in visiting order.
    pub rooms: Vec<Room>,
    /// Timing slots, in visiting order.
    pub timings: Vec<TimingSlot>,
    /// Target headcount per room and slot, special member included.
    pub per_room: usize,
}

impl AllocationRequest {
    /// Creates a new allocation request.
    pub fn new(
        members: Vec<Member>,
        rooms: Vec<Room>,
        timings: Vec<TimingSlot>,
        per_room: usize,
    ) -> Self {
        Self {
            members,
            rooms,
            timings,
            per_room,
        }
    }

    /// Checks the allocation preconditions.
    pub fn validate(&self) -> ValidationResult {
        validate_request(&self.members, &self.rooms, &self.timings, self.per_room)
    }
}

/// Round-robin duty allocator.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_roster::allocator::DutyAllocator;
/// use u_roster::models::{Member, Room, TimingSlot};
/// use chrono::{TimeZone, Utc};
///
/// let members = vec![
///     Member::special("S1", "Head"),
///     Member::new("G1", "Asha"),
///     Member::new("G2", "Ravi"),
/// ];
/// let rooms = vec![Room::new("A", "101")];
/// let timings = vec![TimingSlot::new(
///     Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
/// )];
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let roster = DutyAllocator::new()
///     .allocate(&members, &rooms, &timings, 2, &mut rng)
///     .unwrap();
/// assert_eq!(roster.assignment_count(), 2);
/// assert_eq!(roster.special_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DutyAllocator;

impl DutyAllocator {
    /// Creates a new allocator.
    pub fn new() -> Self {
        Self
    }

    /// Validates the inputs, shuffles members with `rng` and allocates.
    ///
    /// Fails without allocating anything when a precondition is violated.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        members: &[Member],
        rooms: &[Room],
        timings: &[TimingSlot],
        per_room: usize,
        rng: &mut R,
    ) -> Result<Roster> {
        validate_request(members, rooms, timings, per_room)?;

        let mut shuffled = members.to_vec();
        shuffled.shuffle(rng);
        Ok(self.seat(&shuffled, rooms, timings, per_room))
    }

    /// Validates the inputs and allocates members in the given order.
    ///
    /// Use this when the caller already holds a permutation of the members;
    /// the result is fully deterministic.
    pub fn allocate_in_order(
        &self,
        members: &[Member],
        rooms: &[Room],
        timings: &[TimingSlot],
        per_room: usize,
    ) -> Result<Roster> {
        validate_request(members, rooms, timings, per_room)?;
        Ok(self.seat(members, rooms, timings, per_room))
    }

    /// Allocates from a request.
    pub fn allocate_request<R: Rng + ?Sized>(
        &self,
        request: &AllocationRequest,
        rng: &mut R,
    ) -> Result<Roster> {
        self.allocate(
            &request.members,
            &request.rooms,
            &request.timings,
            request.per_room,
            rng,
        )
    }

    fn seat(
        &self,
        members: &[Member],
        rooms: &[Room],
        timings: &[TimingSlot],
        per_room: usize,
    ) -> Roster {
        let (special, general): (Vec<&Member>, Vec<&Member>) =
            members.iter().partition(|m| m.special);

        debug!(
            special = special.len(),
            general = general.len(),
            rooms = rooms.len(),
            timings = timings.len(),
            per_room,
            "allocating duties"
        );

        let mut roster = Roster::new();
        let mut gen_index = 0;
        let mut underfilled = 0usize;

        for (timing_index, timing) in timings.iter().enumerate() {
            for (room_index, room) in rooms.iter().enumerate() {
                let mut batch = Vec::with_capacity(per_room);

                if !special.is_empty() {
                    let s = special[(timing_index + room_index) % special.len()];
                    batch.push(Assignment::new(s.clone(), room.clone(), timing.clone()));
                }

                while batch.len() < per_room && gen_index < general.len() {
                    batch.push(Assignment::new(
                        general[gen_index].clone(),
                        room.clone(),
                        timing.clone(),
                    ));
                    gen_index += 1;
                }

                if batch.len() < per_room {
                    underfilled += 1;
                }
                roster.extend(batch);
            }
        }

        if underfilled > 0 {
            warn!(
                underfilled,
                "general members exhausted; some rooms are below the requested headcount"
            );
        }

        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::validation::ValidationErrorKind;
    use chrono::{Duration, TimeZone, Utc};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn specials(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| Member::special(format!("S{i}"), format!("Special {i}")))
            .collect()
    }

    fn generals(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| Member::new(format!("G{i}"), format!("General {i}")))
            .collect()
    }

    fn rooms(n: usize) -> Vec<Room> {
        (0..n).map(|i| Room::new("A", format!("{}", 101 + i))).collect()
    }

    fn timings(n: usize) -> Vec<TimingSlot> {
        let base = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        (0..n as i64)
            .map(|i| {
                let from = base + Duration::days(i);
                TimingSlot::new(from, from + Duration::hours(3))
            })
            .collect()
    }

    fn ids(batch: &[&Assignment]) -> Vec<String> {
        batch.iter().map(|a| a.member.id.clone()).collect()
    }

    #[test]
    fn test_three_rooms_two_specials_in_order() {
        let mut members = specials(2);
        members.extend(generals(6));
        let rs = rooms(3);
        let ts = timings(1);

        let roster = DutyAllocator::new()
            .allocate_in_order(&members, &rs, &ts, 2)
            .unwrap();

        assert_eq!(roster.assignment_count(), 6);
        assert_eq!(ids(&roster.assignments_at(&rs[0], &ts[0])), ["S0", "G0"]);
        assert_eq!(ids(&roster.assignments_at(&rs[1], &ts[0])), ["S1", "G1"]);
        // Specials wrap around for the third room
        assert_eq!(ids(&roster.assignments_at(&rs[2], &ts[0])), ["S0", "G2"]);
    }

    #[test]
    fn test_output_order_is_slot_then_room() {
        let members = generals(4);
        let rs = rooms(2);
        let ts = timings(2);

        let roster = DutyAllocator::new()
            .allocate_in_order(&members, &rs, &ts, 1)
            .unwrap();

        let order: Vec<(String, String, usize)> = roster
            .assignments
            .iter()
            .map(|a| {
                let t = ts.iter().position(|t| t == &a.timing).unwrap();
                (a.member.id.clone(), a.room.room_no.clone(), t)
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("G0".into(), "101".into(), 0),
                ("G1".into(), "102".into(), 0),
                ("G2".into(), "101".into(), 1),
                ("G3".into(), "102".into(), 1),
            ]
        );
    }

    #[test]
    fn test_special_rotation_uses_slot_and_room_index() {
        let mut members = specials(3);
        members.extend(generals(3));
        let rs = rooms(2);
        let ts = timings(2);

        let roster = DutyAllocator::new()
            .allocate_in_order(&members, &rs, &ts, 1)
            .unwrap();

        let seated: Vec<String> = roster.assignments.iter().map(|a| a.member.id.clone()).collect();
        // (0,0)->S0 (0,1)->S1 (1,0)->S1 (1,1)->S2
        assert_eq!(seated, ["S0", "S1", "S1", "S2"]);
    }

    #[test]
    fn test_general_cursor_is_shared_and_lenient() {
        // 2 rooms x 2 slots x 3 seats = 12 seats but only 6 members
        let members = generals(6);
        let rs = rooms(2);
        let ts = timings(2);

        let roster = DutyAllocator::new()
            .allocate_in_order(&members, &rs, &ts, 3)
            .unwrap();

        assert_eq!(roster.assignment_count(), 6);
        assert_eq!(roster.assignments_at(&rs[0], &ts[0]).len(), 3);
        assert_eq!(roster.assignments_at(&rs[1], &ts[0]).len(), 3);
        assert!(roster.assignments_at(&rs[0], &ts[1]).is_empty());
        assert!(roster.assignments_at(&rs[1], &ts[1]).is_empty());
    }

    #[test]
    fn test_exhausted_generals_leave_only_specials() {
        let mut members = specials(1);
        members.extend(generals(3));
        let rs = rooms(2);
        let ts = timings(2);

        let roster = DutyAllocator::new()
            .allocate_in_order(&members, &rs, &ts, 2)
            .unwrap();

        // Each pair gets S0; generals fill 3 of the 4 pairs
        assert_eq!(roster.special_count(), 4);
        assert_eq!(roster.assignment_count(), 7);
        assert_eq!(ids(&roster.assignments_at(&rs[1], &ts[1])), ["S0"]);
    }

    #[test]
    fn test_count_matches_fill_formula() {
        let cases = [(0, 7, 3, 2, 2), (2, 9, 2, 3, 3), (1, 4, 4, 1, 1), (4, 2, 3, 2, 2)];
        for (s, g, r, t, per_room) in cases {
            let mut members = specials(s);
            members.extend(generals(g));
            let roster = DutyAllocator::new()
                .allocate_in_order(&members, &rooms(r), &timings(t), per_room)
                .unwrap();

            let mut remaining = g;
            let mut expected = 0;
            for _ in 0..r * t {
                let special = usize::from(s > 0);
                let seated = per_room.min(special + remaining);
                remaining -= seated.saturating_sub(special);
                expected += seated;
            }
            assert_eq!(roster.assignment_count(), expected, "case {s},{g},{r},{t},{per_room}");
        }
    }

    #[test]
    fn test_general_members_never_repeat() {
        let mut members = specials(2);
        members.extend(generals(20));
        let mut rng = SmallRng::seed_from_u64(42);

        let roster = DutyAllocator::new()
            .allocate(&members, &rooms(4), &timings(3), 3, &mut rng)
            .unwrap();

        let mut seen = HashSet::new();
        for a in roster.assignments.iter().filter(|a| !a.is_special()) {
            assert!(seen.insert(a.member.id.clone()), "{} seated twice", a.member.id);
        }
    }

    #[test]
    fn test_exactly_one_special_per_pair() {
        let mut members = specials(3);
        members.extend(generals(12));
        let rs = rooms(3);
        let ts = timings(2);
        let mut rng = SmallRng::seed_from_u64(7);

        let roster = DutyAllocator::new()
            .allocate(&members, &rs, &ts, 2, &mut rng)
            .unwrap();

        let mut per_pair: HashMap<(usize, usize), usize> = HashMap::new();
        for a in roster.assignments.iter().filter(|a| a.is_special()) {
            let t = ts.iter().position(|t| t == &a.timing).unwrap();
            let r = rs.iter().position(|r| r == &a.room).unwrap();
            *per_pair.entry((t, r)).or_insert(0) += 1;
        }
        assert_eq!(per_pair.len(), rs.len() * ts.len());
        assert!(per_pair.values().all(|&n| n == 1));
    }

    #[test]
    fn test_no_specials_means_no_special_assignments() {
        let mut rng = SmallRng::seed_from_u64(1);
        let roster = DutyAllocator::new()
            .allocate(&generals(10), &rooms(3), &timings(2), 2, &mut rng)
            .unwrap();
        assert_eq!(roster.special_count(), 0);
        assert_eq!(roster.assignment_count(), 10);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut members = specials(2);
        members.extend(generals(10));
        let allocator = DutyAllocator::new();

        let a = allocator
            .allocate(&members, &rooms(3), &timings(2), 2, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        let b = allocator
            .allocate(&members, &rooms(3), &timings(2), 2, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_request() {
        let mut rng = SmallRng::seed_from_u64(0);
        let err = DutyAllocator::new()
            .allocate(&generals(5), &rooms(3), &timings(1), 2, &mut rng)
            .unwrap_err();

        match err {
            RosterError::Rejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ValidationErrorKind::InsufficientMembersForCapacity);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_per_room_and_empty_timings() {
        let err = DutyAllocator::new()
            .allocate_in_order(&generals(3), &rooms(3), &[], 0)
            .unwrap_err();
        let kinds: Vec<_> = err.validation_errors().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::InvalidHeadcount));
        assert!(kinds.contains(&ValidationErrorKind::EmptyTimings));
    }

    #[test]
    fn test_allocate_request() {
        let request = AllocationRequest::new(generals(4), rooms(2), timings(1), 2);
        assert!(request.validate().is_ok());

        let roster = DutyAllocator::new()
            .allocate_request(&request, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(roster.assignment_count(), 4);
    }
}
