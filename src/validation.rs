//! Input validation for roster generation.
//!
//! Two layers of checks:
//! - request preconditions, checked before allocation starts
//!   (headcount, member sufficiency, non-empty inputs);
//! - record checks for members, rooms and timing slots as they are entered
//!   or loaded (field formats, duplicates, window ordering).
//!
//! Request checks report every violated precondition at once.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Member, Room, TimingSlot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Maximum length of a member name.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length of a member ID.
pub const MAX_ID_LEN: usize = 20;
/// Maximum length of a block or room number code.
pub const MAX_ROOM_CODE_LEN: usize = 5;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Persons per room is not a positive integer.
    InvalidHeadcount,
    /// Fewer members than rooms.
    InsufficientMembersForRooms,
    /// Fewer members than rooms × persons per room.
    InsufficientMembersForCapacity,
    /// No members to assign.
    EmptyMembers,
    /// No rooms to fill.
    EmptyRooms,
    /// No timing slots.
    EmptyTimings,
    /// A required field is blank.
    MissingField,
    /// Member name is not alphabetic or too long.
    InvalidMemberName,
    /// Member ID is not upper-case alphanumeric or too long.
    InvalidMemberId,
    /// Two members share the same ID.
    DuplicateMemberId,
    /// Block or room number is not alphanumeric or too long.
    InvalidRoomCode,
    /// The same (block, room number) pair appears twice.
    DuplicateRoom,
    /// Slot start is not before slot end.
    InvalidTimingWindow,
    /// Slot starts before the current time.
    SlotInPast,
    /// Roster title is blank or has unsupported characters.
    InvalidTitle,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an allocation request.
///
/// Checks:
/// 1. `per_room` is positive
/// 2. at least as many members as rooms
/// 3. at least `rooms × per_room` members
/// 4. members, rooms and timings are all non-empty
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(
    members: &[Member],
    rooms: &[Room],
    timings: &[TimingSlot],
    per_room: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    if per_room == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidHeadcount,
            "Persons per room must be a number greater than zero",
        ));
    }

    if members.len() < rooms.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientMembersForRooms,
            format!(
                "Insufficient members: {} members for {} rooms",
                members.len(),
                rooms.len()
            ),
        ));
    }

    let seats = rooms.len().saturating_mul(per_room);
    if members.len() < seats {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientMembersForCapacity,
            format!(
                "Insufficient members for {per_room} per room: {} members for {seats} seats",
                members.len()
            ),
        ));
    }

    if members.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyMembers,
            "No members available",
        ));
    }
    if rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRooms,
            "No rooms available",
        ));
    }
    if timings.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTimings,
            "No timing slots available",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates stored records.
///
/// Checks:
/// 1. No duplicate member IDs
/// 2. No duplicate (block, room number) pairs
/// 3. Every timing slot has `from < to`
pub fn validate_records(
    members: &[Member],
    rooms: &[Room],
    timings: &[TimingSlot],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut member_ids = HashSet::new();
    for m in members {
        if !member_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateMemberId,
                format!("Duplicate member ID: {}", m.id),
            ));
        }
    }

    let mut room_keys = HashSet::new();
    for r in rooms {
        if !room_keys.insert((r.block.as_str(), r.room_no.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRoom,
                format!("Duplicate room: block {} room {}", r.block, r.room_no),
            ));
        }
    }

    for (idx, t) in timings.iter().enumerate() {
        if !t.is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimingWindow,
                format!("Timing slot #{} does not end after it starts", idx + 1),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a trimmed member name: letters and spaces, 1 to 50 characters.
pub fn check_member_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(missing("Name"));
    }
    let valid = name.chars().count() <= MAX_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidMemberName,
            format!("Name must be alphabetic and max {MAX_NAME_LEN} characters"),
        ))
    }
}

/// Checks a normalized member ID: `A-Z` and `0-9`, 1 to 20 characters.
pub fn check_member_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(missing("ID"));
    }
    let valid = id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidMemberId,
            format!("ID must be uppercase alphanumeric (A-Z, 0-9) and max {MAX_ID_LEN} characters"),
        ))
    }
}

/// Checks a block or room number code: alphanumeric, 1 to 5 characters.
pub fn check_room_code(field: &str, code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(missing(field));
    }
    if code.chars().count() > MAX_ROOM_CODE_LEN {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidRoomCode,
            format!("{field} should be max {MAX_ROOM_CODE_LEN} characters long"),
        ));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidRoomCode,
            format!("{field} allows only alphanumeric characters"),
        ));
    }
    Ok(())
}

/// Checks a new timing slot against the current time.
pub fn check_timing(slot: &TimingSlot, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if slot.from < now {
        return Err(ValidationError::new(
            ValidationErrorKind::SlotInPast,
            "Cannot create slot before current time",
        ));
    }
    if !slot.is_well_formed() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidTimingWindow,
            "From time must be earlier than To time",
        ));
    }
    Ok(())
}

/// Checks a roster title: non-blank, letters, digits and spaces only.
pub fn check_title(title: &str) -> Result<(), ValidationError> {
    let valid = !title.trim().is_empty()
        && title.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidTitle,
            "Please enter a valid title (alphabets and numbers only)",
        ))
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::MissingField,
        format!("{field} is required"),
    )
}
