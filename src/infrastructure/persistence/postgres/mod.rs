pub mod catalog_repository;
pub mod commerce_repository;
pub mod document_repository;
pub mod integration_repository;
pub mod session_repository;
pub mod user_repository;

pub use catalog_repository::{PostgresCompanyRepository, PostgresItemRepository};
pub use commerce_repository::{
  PostgresCartRepository, PostgresOrderRepository, PostgresPaymentRepository,
};
pub use document_repository::{PostgresDocumentRepository, PostgresDocumentSequenceRepository};
pub use integration_repository::{PostgresIntegrationRepository, PostgresSyncLogRepository};
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
