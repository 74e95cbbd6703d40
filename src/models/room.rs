//! Room model.
//!
//! Rooms are identified by the `(block, room_no)` pair. Both parts are short
//! upper-case codes, e.g. block `A`, room `101`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A room that receives members during each timing slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Building block code.
    pub block: String,
    /// Room number within the block.
    #[serde(rename = "roomNo")]
    pub room_no: String,
}

impl Room {
    /// Creates a new room.
    pub fn new(block: impl Into<String>, room_no: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            room_no: room_no.into(),
        }
    }

    /// Whether two rooms denote the same physical room.
    #[inline]
    pub fn same_as(&self, block: &str, room_no: &str) -> bool {
        self.block == block && self.room_no == room_no
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.block, self.room_no)
    }
}
