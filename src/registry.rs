//! Member, room and timing slot registry.
//!
//! Holds the three input collections in memory and writes the affected
//! collection back to the [`DataStore`] after every change. A change is only
//! applied in memory once the write succeeded.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::info;

use crate::allocator::AllocationRequest;
use crate::error::{Result, RosterError};
use crate::models::{title_case, Member, Room, TimingSlot};
use crate::store::DataStore;
use crate::validation::{
    check_member_id, check_member_name, check_room_code, check_timing, ValidationError,
    ValidationErrorKind,
};

/// In-memory view of the stored collections.
#[derive(Debug, Clone)]
pub struct Registry {
    store: DataStore,
    members: Vec<Member>,
    rooms: Vec<Room>,
    timings: Vec<TimingSlot>,
}

impl Registry {
    /// Loads all collections from `store`.
    pub fn open(store: DataStore) -> Self {
        let members = store.members();
        let rooms = store.rooms();
        let timings = store.timings();
        Self {
            store,
            members,
            rooms,
            timings,
        }
    }

    /// Backing store.
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Members in storage order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Rooms in storage order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Timing slots in storage order.
    pub fn timings(&self) -> &[TimingSlot] {
        &self.timings
    }

    /// Registers a general member.
    ///
    /// The name is trimmed and stored in Title Case; the ID is trimmed and
    /// upper-cased.
    pub fn add_member(&mut self, name: &str, id: &str) -> Result<Member> {
        let name = name.trim();
        let id = id.trim().to_uppercase();

        if name.is_empty() || id.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Both Name and ID are required",
            )
            .into());
        }
        check_member_name(name)?;
        check_member_id(&id)?;
        if self.members.iter().any(|m| m.id == id) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateMemberId,
                "A member with this ID already exists",
            )
            .into());
        }

        let member = Member::new(id, title_case(name));
        let mut updated = self.members.clone();
        updated.push(member.clone());
        self.store.save_members(&updated)?;
        self.members = updated;

        info!(id = %member.id, name = %member.name, "member added");
        Ok(member)
    }

    /// Removes a member by ID.
    pub fn remove_member(&mut self, id: &str) -> Result<Member> {
        let idx = self.member_index(id)?;
        let mut updated = self.members.clone();
        let removed = updated.remove(idx);
        self.store.save_members(&updated)?;
        self.members = updated;

        info!(id = %removed.id, "member removed");
        Ok(removed)
    }

    /// Flips a member's special flag, returning the new value.
    pub fn toggle_special(&mut self, id: &str) -> Result<bool> {
        let idx = self.member_index(id)?;
        let mut updated = self.members.clone();
        updated[idx].special = !updated[idx].special;
        let special = updated[idx].special;
        self.store.save_members(&updated)?;
        self.members = updated;

        info!(id, special, "member marked as {}", if special { "special" } else { "normal" });
        Ok(special)
    }

    /// Registers a room.
    ///
    /// Both codes are trimmed and upper-cased.
    pub fn add_room(&mut self, block: &str, room_no: &str) -> Result<Room> {
        let block = block.trim().to_uppercase();
        let room_no = room_no.trim().to_uppercase();

        if block.is_empty() || room_no.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Both Block and Room No. are required",
            )
            .into());
        }
        check_room_code("Block", &block)?;
        check_room_code("Room No.", &room_no)?;
        if self.rooms.iter().any(|r| r.same_as(&block, &room_no)) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateRoom,
                "This room already exists in the same block",
            )
            .into());
        }

        let room = Room::new(block, room_no);
        let mut updated = self.rooms.clone();
        updated.push(room.clone());
        self.store.save_rooms(&updated)?;
        self.rooms = updated;

        info!(room = %room, "room added");
        Ok(room)
    }

    /// Removes the room at `index` (storage order).
    pub fn remove_room(&mut self, index: usize) -> Result<Room> {
        check_index("rooms", index, self.rooms.len())?;
        let mut updated = self.rooms.clone();
        let removed = updated.remove(index);
        self.store.save_rooms(&updated)?;
        self.rooms = updated;

        info!(room = %removed, "room removed");
        Ok(removed)
    }

    /// Registers a timing slot that starts no earlier than `now`.
    pub fn add_timing(&mut self, slot: TimingSlot, now: DateTime<Utc>) -> Result<TimingSlot> {
        check_timing(&slot, now)?;

        let mut updated = self.timings.clone();
        updated.push(slot.clone());
        self.store.save_timings(&updated)?;
        self.timings = updated;

        info!(from = %slot.from, to = %slot.to, "timing slot added");
        Ok(slot)
    }

    /// Registers a slot on `date` between two wall-clock times in `tz`.
    ///
    /// Seconds are dropped from both times.
    pub fn add_timing_on<Tz: TimeZone>(
        &mut self,
        date: NaiveDate,
        from: NaiveTime,
        to: NaiveTime,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Result<TimingSlot> {
        let slot = TimingSlot::new(at(date, from, tz)?, at(date, to, tz)?);
        self.add_timing(slot, now)
    }

    /// Removes the timing slot at `index` (storage order).
    pub fn remove_timing(&mut self, index: usize) -> Result<TimingSlot> {
        check_index("timings", index, self.timings.len())?;
        let mut updated = self.timings.clone();
        let removed = updated.remove(index);
        self.store.save_timings(&updated)?;
        self.timings = updated;

        info!(from = %removed.from, to = %removed.to, "timing slot removed");
        Ok(removed)
    }

    /// Members sorted by name, case-insensitively.
    pub fn members_by_name(&self) -> Vec<&Member> {
        let mut sorted: Vec<&Member> = self.members.iter().collect();
        sorted.sort_by_cached_key(|m| (m.name.to_lowercase(), m.id.clone()));
        sorted
    }

    /// Rooms grouped by block (blocks sorted), with their storage index.
    pub fn rooms_by_block(&self) -> Vec<(&str, Vec<(usize, &Room)>)> {
        let mut blocks: Vec<(&str, Vec<(usize, &Room)>)> = Vec::new();
        for (idx, room) in self.rooms.iter().enumerate() {
            match blocks.iter_mut().find(|(b, _)| *b == room.block) {
                Some((_, rooms)) => rooms.push((idx, room)),
                None => blocks.push((room.block.as_str(), vec![(idx, room)])),
            }
        }
        blocks.sort_by(|a, b| a.0.cmp(b.0));
        blocks
    }

    /// Timing slots sorted by start, with their storage index.
    pub fn timings_by_start(&self) -> Vec<(usize, &TimingSlot)> {
        let mut sorted: Vec<(usize, &TimingSlot)> = self.timings.iter().enumerate().collect();
        sorted.sort_by_key(|(_, t)| (t.from, t.to));
        sorted
    }

    /// Builds an allocation request from the current collections.
    pub fn allocation_request(&self, per_room: usize) -> AllocationRequest {
        AllocationRequest::new(
            self.members.clone(),
            self.rooms.clone(),
            self.timings.clone(),
            per_room,
        )
    }

    fn member_index(&self, id: &str) -> Result<usize> {
        let id = id.trim().to_uppercase();
        self.members
            .iter()
            .position(|m| m.id == id)
            .ok_or(RosterError::MemberNotFound(id))
    }
}

fn check_index(collection: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(RosterError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}

fn at<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Result<DateTime<Utc>> {
    let time = time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time);
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::InvalidTimingWindow,
                format!(
                    "{date} {} does not exist in the configured time zone",
                    time.format("%H:%M")
                ),
            )
            .into()
        })
}
