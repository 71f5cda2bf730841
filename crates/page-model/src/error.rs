use crate::record::PageId;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("page {identity} not found")]
    NotFound { identity: PageId },
    #[error("rotation of {delta} degrees is not a multiple of 90")]
    InvalidRotation { delta: i32 },
    #[error("stored rotation of {degrees} degrees is outside 0..360")]
    RotationOutOfRange { degrees: u16 },
    #[error("page identity {identity} is not a 1-based page number")]
    InvalidIdentity { identity: PageId },
    #[error("page {identity} is listed more than once")]
    DuplicateIdentity { identity: PageId },
    #[error("page {identity} has a non-positive or non-finite size")]
    InvalidGeometry { identity: PageId },
    #[error("no drag in progress")]
    NoDragInProgress,
    #[error("every page has been deleted; refusing to save an empty document")]
    EmptyResult,
    #[error("destination {} is the source document", path.display())]
    OverwritesSource { path: PathBuf },
}
