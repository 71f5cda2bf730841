use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based page number in the original document. Never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId(pub u32);

impl PageId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clockwise rotation in degrees, always one of 0, 90, 180, 270.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u16")]
pub struct Rotation(u16);

impl TryFrom<u16> for Rotation {
    type Error = EditError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        if degrees >= 360 {
            return Err(EditError::RotationOutOfRange { degrees });
        }
        if degrees % 90 != 0 {
            return Err(EditError::InvalidRotation { delta: i32::from(degrees) });
        }

        Ok(Self(degrees))
    }
}

impl Rotation {
    pub const NONE: Self = Self(0);

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn rotated_by(self, delta: i32) -> Result<Self, EditError> {
        if delta % 90 != 0 {
            return Err(EditError::InvalidRotation { delta });
        }

        let degrees = (i32::from(self.0) + delta.rem_euclid(360)).rem_euclid(360);
        Ok(Self(degrees as u16))
    }
}

/// Geometry reported by the document loader for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub identity: PageId,
    pub width: f64,
    pub height: f64,
}

impl PageInfo {
    pub fn letter(identity: PageId) -> Self {
        Self { identity, width: 612.0, height: 792.0 }
    }

    pub(crate) fn has_valid_geometry(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    identity: PageId,
    width: f64,
    height: f64,
    rotation: Rotation,
    deleted: bool,
}

impl PageRecord {
    pub fn from_info(info: PageInfo) -> Self {
        Self {
            identity: info.identity,
            width: info.width,
            height: info.height,
            rotation: Rotation::NONE,
            deleted: false,
        }
    }

    pub fn identity(&self) -> PageId {
        self.identity
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
