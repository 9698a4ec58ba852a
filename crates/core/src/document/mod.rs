//! Supporting documents and the per-period document window.

pub mod error;
pub mod types;
pub mod window;

pub use error::DocumentError;
pub use types::{Document, DocumentCategory, RecordDocumentInput};
pub use window::{DocumentWindow, is_document_eligible};
