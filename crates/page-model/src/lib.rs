//! In-memory page-edit session: an ordered, soft-deletable page sequence, a
//! selection used to scope bulk deletes, a drag-reorder controller, and the
//! change-set handed to a document-rewriting backend at save time.

mod change_set;
mod drag;
mod error;
mod preferences;
mod record;
mod selection;
mod sequence;
mod session;

pub use change_set::ChangeSet;
pub use drag::{DragReorder, DragState};
pub use error::EditError;
pub use preferences::Preferences;
pub use record::{PageId, PageInfo, PageRecord, Rotation};
pub use selection::{delete_targets, DeletePlan, SelectionSet};
pub use sequence::{ActiveView, PageSequence};
pub use session::{EditAction, EditSession, PageView, SaveRequest, SessionSnapshot};
