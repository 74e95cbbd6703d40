//! Presentation grouping.
//!
//! Reshapes a flat assignment list into `date -> time label -> block ->
//! assignments` for tabular display. Every level keeps first-seen order, so
//! a roster produced by the allocator groups in slot order, then room order.
//! Reshaping is lossless: [`GroupedRoster::flatten`] returns every input
//! assignment exactly once.

use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt;

use crate::models::Assignment;

/// Assignments of one block during one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockGroup {
    /// Block code.
    pub block: String,
    /// Assignments in input order.
    pub assignments: Vec<Assignment>,
}

/// All blocks of one time label on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotGroup {
    /// `hh:mm AM - hh:mm PM`.
    pub time: String,
    /// Blocks in first-seen order.
    pub blocks: Vec<BlockGroup>,
}

/// All slots of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Slots in first-seen order.
    pub slots: Vec<SlotGroup>,
}

/// Assignments nested by date, time label and block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedRoster {
    /// Dates in first-seen order.
    pub dates: Vec<DateGroup>,
}

impl BlockGroup {
    /// Splits the block's assignments by room number, in first-seen order.
    pub fn by_room(&self) -> Vec<(&str, Vec<&Assignment>)> {
        let mut rooms: Vec<(&str, Vec<&Assignment>)> = Vec::new();
        for a in &self.assignments {
            let key = a.room.room_no.as_str();
            entry(&mut rooms, |(k, _)| *k == key, || (key, Vec::new()))
                .1
                .push(a);
        }
        rooms
    }
}

impl GroupedRoster {
    /// Groups assignments using local time for date and time labels.
    pub fn group_by_timing(assignments: &[Assignment]) -> Self {
        Self::group_by_timing_in(assignments, &Local)
    }

    /// Groups assignments with date and time labels rendered in `tz`.
    pub fn group_by_timing_in<Tz: TimeZone>(assignments: &[Assignment], tz: &Tz) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let mut grouped = Self::default();
        for a in assignments {
            let date = a.timing.date_label(tz);
            let time = a.timing.time_label(tz);

            let day = entry(
                &mut grouped.dates,
                |d| d.date == date,
                || DateGroup {
                    date: date.clone(),
                    slots: Vec::new(),
                },
            );
            let slot = entry(
                &mut day.slots,
                |s| s.time == time,
                || SlotGroup {
                    time: time.clone(),
                    blocks: Vec::new(),
                },
            );
            let block = entry(
                &mut slot.blocks,
                |b| b.block == a.room.block,
                || BlockGroup {
                    block: a.room.block.clone(),
                    assignments: Vec::new(),
                },
            );
            block.assignments.push(a.clone());
        }
        grouped
    }

    /// Looks up the assignments of one block at one date and time label.
    pub fn get(&self, date: &str, time: &str, block: &str) -> Option<&[Assignment]> {
        self.dates
            .iter()
            .find(|d| d.date == date)?
            .slots
            .iter()
            .find(|s| s.time == time)?
            .blocks
            .iter()
            .find(|b| b.block == block)
            .map(|b| b.assignments.as_slice())
    }

    /// Total number of grouped assignments.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether nothing was grouped.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates all assignments in group order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.dates
            .iter()
            .flat_map(|d| &d.slots)
            .flat_map(|s| &s.blocks)
            .flat_map(|b| &b.assignments)
    }

    /// Flattens the groups back into a list.
    pub fn flatten(&self) -> Vec<Assignment> {
        self.iter().cloned().collect()
    }
}

fn entry<'a, T>(
    items: &'a mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    make: impl FnOnce() -> T,
) -> &'a mut T {
    let idx = match items.iter().position(matches) {
        Some(idx) => idx,
        None => {
            items.push(make());
            items.len() - 1
        }
    };
    &mut items[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Room, TimingSlot};
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    fn slot(day: u32, hour: u32) -> TimingSlot {
        let from = Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap();
        TimingSlot::new(from, from + Duration::hours(2))
    }

    fn assignment(id: &str, block: &str, room: &str, timing: TimingSlot) -> Assignment {
        Assignment::new(Member::new(id, "Name"), Room::new(block, room), timing)
    }

    fn sample() -> Vec<Assignment> {
        vec![
            assignment("M1", "B", "1", slot(14, 9)),
            assignment("M2", "A", "1", slot(14, 9)),
            assignment("M3", "B", "2", slot(14, 9)),
            assignment("M4", "B", "1", slot(14, 14)),
            assignment("M5", "A", "3", slot(15, 9)),
            assignment("M6", "B", "1", slot(14, 9)),
        ]
    }

    #[test]
    fn test_group_structure() {
        let g = GroupedRoster::group_by_timing_in(&sample(), &Utc);

        let dates: Vec<_> = g.dates.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2025-03-14", "2025-03-15"]);

        let times: Vec<_> = g.dates[0].slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, ["09:00 AM - 11:00 AM", "02:00 PM - 04:00 PM"]);

        let blocks: Vec<_> = g.dates[0].slots[0]
            .blocks
            .iter()
            .map(|b| b.block.as_str())
            .collect();
        assert_eq!(blocks, ["B", "A"]);

        let b = g.get("2025-03-14", "09:00 AM - 11:00 AM", "B").unwrap();
        let ids: Vec<_> = b.iter().map(|a| a.member.id.as_str()).collect();
        assert_eq!(ids, ["M1", "M3", "M6"]);
        assert!(g.get("2025-03-14", "09:00 AM - 11:00 AM", "C").is_none());
    }

    #[test]
    fn test_group_is_lossless() {
        let input = sample();
        let g = GroupedRoster::group_by_timing_in(&input, &Utc);
        assert_eq!(g.len(), input.len());

        let mut counts: HashMap<Assignment, i32> = HashMap::new();
        for a in &input {
            *counts.entry(a.clone()).or_insert(0) += 1;
        }
        for a in g.flatten() {
            *counts.entry(a).or_insert(0) -= 1;
        }
        assert!(counts.values().all(|&n| n == 0));
    }

    #[test]
    fn test_by_room() {
        let g = GroupedRoster::group_by_timing_in(&sample(), &Utc);
        let block_b = &g.dates[0].slots[0].blocks[0];
        let rooms = block_b.by_room();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].0, "1");
        assert_eq!(rooms[0].1.len(), 2);
        assert_eq!(rooms[1].0, "2");
    }

    #[test]
    fn test_empty_input() {
        let g = GroupedRoster::group_by_timing_in(&[], &Utc);
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
    }
}
