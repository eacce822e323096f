pub mod change_document_status;
pub mod create_document;
pub mod delete_document;
pub mod get_document;
pub mod list_documents;
pub mod update_document;

pub use change_document_status::{
  ChangeDocumentStatusCommand, ChangeDocumentStatusResponse, ChangeDocumentStatusUseCase,
};
pub use create_document::{CreateDocumentCommand, CreateDocumentUseCase};
pub use delete_document::{DeleteDocumentCommand, DeleteDocumentUseCase};
pub use get_document::{
  DocumentDetailsResponse, DocumentDto, DocumentItemDto, GetDocumentCommand, GetDocumentUseCase,
};
pub use list_documents::{ListDocumentsCommand, ListDocumentsResponse, ListDocumentsUseCase};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentUseCase};
