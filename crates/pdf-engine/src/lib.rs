use lopdf::Document;
use page_model::{ChangeSet, PageId, PageInfo};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

mod rewrite;
mod tree;

#[cfg(test)]
mod fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum OpenSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<&Path> for OpenSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfEngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("invalid handle {0}")]
    InvalidHandle(u64),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("page {0} appears more than once in the output order")]
    DuplicatePage(u32),
    #[error("encrypted PDFs are not supported in the default backend")]
    EncryptedUnsupported,
    #[error("no documents to merge")]
    NothingToMerge,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Document collaborator used by the edit session: it reports page geometry on
/// load and writes change-sets out on save.
pub trait PdfEngine {
    fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError>;
    fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError>;
    fn pages(&self, handle: DocumentHandle) -> Result<Vec<PageInfo>, PdfEngineError>;
    fn write_edited(
        &self,
        handle: DocumentHandle,
        change_set: &ChangeSet,
        destination: &Path,
    ) -> Result<(), PdfEngineError>;
    fn merge(&self, sources: &[PathBuf], destination: &Path) -> Result<(), PdfEngineError>;
    fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError>;
}

#[derive(Debug, Clone)]
struct DocumentRecord {
    bytes: Vec<u8>,
    pages: Vec<PageInfo>,
}

#[derive(Debug, Default)]
pub struct LopdfEngine {
    next_handle: u64,
    docs: HashMap<DocumentHandle, DocumentRecord>,
}

impl LopdfEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse(bytes: &[u8]) -> Result<Document, PdfEngineError> {
        if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
            return Err(PdfEngineError::EncryptedUnsupported);
        }

        Ok(Document::load_mem(bytes)?)
    }

    fn parse_pages(doc: &Document) -> Result<Vec<PageInfo>, PdfEngineError> {
        let pages = doc.get_pages();
        let mut infos = Vec::with_capacity(pages.len());

        for (number, object_id) in pages {
            let (width, height) = tree::page_size(doc, object_id)?;
            infos.push(PageInfo { identity: PageId(number), width, height });
        }

        if infos.is_empty() {
            return Err(PdfEngineError::Backend("document has no pages".to_owned()));
        }

        Ok(infos)
    }

    fn record(&self, handle: DocumentHandle) -> Result<&DocumentRecord, PdfEngineError> {
        self.docs.get(&handle).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }

    /// Serialized bytes of the document after applying `change_set`.
    pub fn edited_bytes(
        &self,
        handle: DocumentHandle,
        change_set: &ChangeSet,
    ) -> Result<Vec<u8>, PdfEngineError> {
        let mut doc = Self::parse(&self.record(handle)?.bytes)?;
        rewrite::apply_change_set(&mut doc, change_set)?;
        save_to_vec(&mut doc)
    }
}

impl PdfEngine for LopdfEngine {
    fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
        let bytes = match source {
            OpenSource::Path(path) => fs::read(path)?,
            OpenSource::Bytes(bytes) => bytes,
        };

        let pages = Self::parse_pages(&Self::parse(&bytes)?)?;

        self.next_handle += 1;
        let handle = DocumentHandle(self.next_handle);
        log::info!("opened document {} with {} pages", handle.raw(), pages.len());
        self.docs.insert(handle, DocumentRecord { bytes, pages });

        Ok(handle)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError> {
        Ok(self.record(handle)?.pages.len() as u32)
    }

    fn pages(&self, handle: DocumentHandle) -> Result<Vec<PageInfo>, PdfEngineError> {
        Ok(self.record(handle)?.pages.clone())
    }

    fn write_edited(
        &self,
        handle: DocumentHandle,
        change_set: &ChangeSet,
        destination: &Path,
    ) -> Result<(), PdfEngineError> {
        let bytes = self.edited_bytes(handle, change_set)?;
        fs::write(destination, bytes)?;

        log::info!(
            "wrote {} pages ({} deleted) to {}",
            change_set.final_order.len(),
            change_set.deleted_identities.len(),
            destination.display()
        );
        Ok(())
    }

    fn merge(&self, sources: &[PathBuf], destination: &Path) -> Result<(), PdfEngineError> {
        let documents = sources
            .iter()
            .map(|path| Self::parse(&fs::read(path)?))
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = rewrite::merge_documents(documents)?;
        fs::write(destination, save_to_vec(&mut merged)?)?;

        log::info!("merged {} documents into {}", sources.len(), destination.display());
        Ok(())
    }

    fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError> {
        self.docs.remove(&handle).map(|_| ()).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }
}

fn save_to_vec(doc: &mut Document) -> Result<Vec<u8>, PdfEngineError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| PdfEngineError::Backend(format!("failed to serialize document: {err}")))?;
    Ok(bytes)
}

pub fn default_engine() -> LopdfEngine {
    LopdfEngine::new()
}
