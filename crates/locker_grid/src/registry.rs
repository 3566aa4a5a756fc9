use std::fmt::{self, Display, Formatter};

use bevy::prelude::*;
use serde::Deserialize;
use strum::{EnumIter, EnumString};
use tracing::debug;

use crate::error::LockerError;

const UNASSIGNED_LABEL: &str = "配備待ち";
const VERIFYING_LABEL: &str = "検証進捗";
const COMPLETE_LABEL: &str = "完了";

/// Stable key of a box. Assigned once at load time and never reused as a
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(u32);

impl Display for BoxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, strum::Display, EnumString, EnumIter,
)]
pub enum BoxSize {
    M,
    L,
}

/// Deployment state shown under the box number. Known labels are normalised
/// when parsed: surrounding whitespace is dropped and progress is rendered
/// back as `検証進捗 done/total`. Anything else is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BoxStatus {
    Unassigned,
    Verifying { done: u32, total: u32 },
    Complete,
    Other(String),
}

impl From<String> for BoxStatus {
    fn from(label: String) -> Self {
        match label.trim() {
            UNASSIGNED_LABEL | "unassigned" => return Self::Unassigned,
            COMPLETE_LABEL | "complete" => return Self::Complete,
            _ => {}
        }

        let progress: Option<(u32, u32)> = label
            .trim()
            .strip_prefix(VERIFYING_LABEL)
            .and_then(|rest| rest.trim().split_once('/'))
            .and_then(|(done, total)| {
                Some((done.trim().parse().ok()?, total.trim().parse().ok()?))
            });

        match progress {
            Some((done, total)) => Self::Verifying { done, total },
            None => Self::Other(label),
        }
    }
}

impl Display for BoxStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "{UNASSIGNED_LABEL}"),
            Self::Verifying { done, total } => write!(f, "{VERIFYING_LABEL} {done}/{total}"),
            Self::Complete => write!(f, "{COMPLETE_LABEL}"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

/// A box record as it appears in the data file, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawBox {
    pub number: String,
    pub size: BoxSize,
    pub status: BoxStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerBox {
    id: BoxId,
    pub number: String,
    pub size: BoxSize,
    pub status: BoxStatus,
}

impl LockerBox {
    pub const fn id(&self) -> BoxId {
        self.id
    }
}

/// Ordered boxes. The index of a box is its grid slot, row-major.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxCollection {
    boxes: Vec<LockerBox>,
}

impl BoxCollection {
    pub fn load(raw_boxes: impl IntoIterator<Item = RawBox>) -> Self {
        let boxes: Vec<LockerBox> = raw_boxes
            .into_iter()
            .zip(0..)
            .map(|(raw, id)| LockerBox {
                id: BoxId(id),
                number: raw.number,
                size: raw.size,
                status: raw.status,
            })
            .collect();
        debug!(count = boxes.len(), "loaded locker boxes");
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LockerBox> {
        self.boxes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LockerBox> {
        self.boxes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes.iter().map(LockerBox::id)
    }

    pub fn position_of(&self, id: BoxId) -> Option<usize> {
        self.boxes.iter().position(|locker_box| locker_box.id == id)
    }

    /// Exchanges the boxes at `i` and `j`. This is the only way the order changes.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), LockerError> {
        let len = self.boxes.len();
        for index in [i, j] {
            if index >= len {
                return Err(LockerError::IndexOutOfRange { index, len });
            }
        }
        if i == j {
            return Err(LockerError::SamePosition(i));
        }
        self.boxes.swap(i, j);
        Ok(())
    }
}
