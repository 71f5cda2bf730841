use crate::change_set::ChangeSet;
use crate::drag::{self, DragReorder};
use crate::error::EditError;
use crate::preferences::Preferences;
use crate::record::{PageId, PageInfo, Rotation};
use crate::selection::{delete_targets, SelectionSet};
use crate::sequence::PageSequence;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Rotate { identity: PageId, delta: i32 },
    Delete { identity: PageId },
    ToggleSelect { identity: PageId },
    ClearSelection,
    BeginDrag { identity: PageId },
    DragOver { identity: PageId },
    Drop { identity: PageId },
    DropAtEnd,
    CancelDrag,
    Move { source: PageId, target: PageId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub identity: PageId,
    pub width: f64,
    pub height: f64,
    pub rotation: Rotation,
    pub selected: bool,
}

/// Read-only copy of what the page grid shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub source: PathBuf,
    pub pages: Vec<PageView>,
    pub selection: Vec<PageId>,
    pub dragging: Option<PageId>,
    pub deleted_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub change_set: ChangeSet,
}

/// One open document. All edits go through [`EditSession::apply`]; a failed
/// action leaves the pages and selection as they were.
#[derive(Debug, Clone)]
pub struct EditSession {
    source: PathBuf,
    pages: PageSequence,
    selection: SelectionSet,
    drag: DragReorder,
}

impl EditSession {
    pub fn open(source: impl Into<PathBuf>, pages: Vec<PageInfo>) -> Result<Self, EditError> {
        let pages = PageSequence::from_pages(pages)?;
        Ok(Self::from_sequence(source, pages))
    }

    pub fn from_sequence(source: impl Into<PathBuf>, pages: PageSequence) -> Self {
        let source = source.into();
        log::debug!("session opened for {} with {} pages", source.display(), pages.len());

        Self { source, pages, selection: SelectionSet::new(), drag: DragReorder::new() }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn pages(&self) -> &PageSequence {
        &self.pages
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn drag(&self) -> &DragReorder {
        &self.drag
    }

    pub fn apply(&mut self, action: EditAction) -> Result<(), EditError> {
        log::debug!("apply {action:?}");

        match action {
            EditAction::Rotate { identity, delta } => {
                self.pages.rotate(identity, delta)?;
            }
            EditAction::Delete { identity } => self.delete(identity),
            EditAction::ToggleSelect { identity } => {
                if !self.pages.is_active(identity) {
                    return Err(EditError::NotFound { identity });
                }
                self.selection.toggle(identity);
            }
            EditAction::ClearSelection => self.selection.clear(),
            EditAction::BeginDrag { identity } => self.drag.begin(&self.pages, identity)?,
            EditAction::DragOver { identity } => self.drag.hover(&self.pages, identity)?,
            EditAction::Drop { identity } => self.drag.drop_on(&mut self.pages, identity)?,
            EditAction::DropAtEnd => self.drag.drop_at_end(&mut self.pages)?,
            EditAction::CancelDrag => self.drag.cancel(),
            EditAction::Move { source, target } => drag::reorder(&mut self.pages, source, target)?,
        }

        Ok(())
    }

    fn delete(&mut self, identity: PageId) {
        let plan = delete_targets(identity, &self.selection);
        self.pages.mark_deleted(plan.identities.iter().copied());

        if plan.consumes_selection {
            self.selection.clear();
        } else {
            self.selection.retain_active(&self.pages);
        }

        if self.drag.source().is_some_and(|source| !self.pages.is_active(source)) {
            self.drag.cancel();
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let pages = self
            .pages
            .active_view()
            .map(|record| PageView {
                identity: record.identity(),
                width: record.width(),
                height: record.height(),
                rotation: record.rotation(),
                selected: self.selection.contains(record.identity()),
            })
            .collect();

        SessionSnapshot {
            source: self.source.clone(),
            pages,
            selection: self.selection.iter().collect(),
            dragging: self.drag.source(),
            deleted_count: self.pages.len() - self.pages.active_len(),
        }
    }

    pub fn change_set(&self) -> ChangeSet {
        ChangeSet::build(&self.pages)
    }

    pub fn is_modified(&self) -> bool {
        !self.change_set().is_unchanged(self.pages.loaded_order())
    }

    /// Builds the hand-off for the document writer, enforcing the save
    /// policy in `preferences`.
    pub fn save_request(
        &self,
        destination: impl Into<PathBuf>,
        preferences: &Preferences,
    ) -> Result<SaveRequest, EditError> {
        let destination = destination.into();
        let change_set = self.change_set();

        if change_set.is_empty_output() && !preferences.allow_empty_output {
            return Err(EditError::EmptyResult);
        }
        if destination == self.source && !preferences.allow_overwrite_source {
            return Err(EditError::OverwritesSource { path: destination });
        }

        Ok(SaveRequest { source: self.source.clone(), destination, change_set })
    }
}
