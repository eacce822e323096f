//! In-memory port implementations shared by service tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::auth::ports::{SessionRepository, UserRepository};
use crate::domain::auth::{AuthError, Bin, Email, RepositoryError, Session, User};
use crate::domain::catalog::{
  CatalogError, Company, CompanyRepository, Item, ItemFilter, ItemRepository, Money, Quantity,
};
use crate::domain::commerce::{
  CartItem, CartRepository, CommerceError, Order, OrderRepository, OrderStatus, Payment,
  PaymentRepository,
};
use crate::domain::document::{
  BusinessDocument, DocumentError, DocumentFilter, DocumentItem, DocumentRepository,
  DocumentSequenceRepository, DocumentType,
};
use crate::domain::integration::{
  ConfirmationBatch, ConfirmationSource, CredentialCipher, DeliveryReceipt, DocumentTransport,
  ExportPayload, Integration, IntegrationError, IntegrationRepository, IntegrationType, SyncLog,
  SyncLogRepository, SyncStatus, TransportError, TransportProvider,
};
use crate::infrastructure::security::{AesCredentialEncryption, Argon2PasswordHasher};

/// Argon2 with minimal cost parameters
pub fn fast_hasher() -> Argon2PasswordHasher {
  Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()
}

#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
  users: Arc<Mutex<Vec<User>>>,
  sessions: Arc<Mutex<Vec<Session>>>,
}

#[async_trait]
impl UserRepository for InMemoryAuthStore {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    if users.iter().any(|u| u.bin_number == user.bin_number) {
      return Err(RepositoryError::DuplicateKey("users_bin_number_unique".into()).into());
    }
    if users.iter().any(|u| u.email == user.email) {
      return Err(RepositoryError::DuplicateKey("users_email_unique".into()).into());
    }
    users.push(user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<User>, AuthError> {
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.bin_number == bin.as_str())
        .cloned(),
    )
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == email.as_str())
        .cloned(),
    )
  }
}

#[async_trait]
impl SessionRepository for InMemoryAuthStore {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    self.sessions.lock().unwrap().push(session.clone());
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    Ok(
      self
        .sessions
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.session_token == token_hash)
        .cloned(),
    )
  }

  async fn delete(&self, session: &Session) -> Result<(), AuthError> {
    self.sessions.lock().unwrap().retain(|s| s.id != session.id);
    Ok(())
  }
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
  companies: Arc<Mutex<Vec<Company>>>,
  items: Arc<Mutex<Vec<Item>>>,
}

impl InMemoryCatalog {
  pub fn seed_company(&self, name: &str, bin: Option<&str>) -> Company {
    let company = Company::new(name.to_string(), bin.map(str::to_string));
    self.companies.lock().unwrap().push(company.clone());
    company
  }

  pub fn seed_item(&self, company_id: Uuid, title: &str, price: Decimal) -> Item {
    let item = Item::new(
      company_id,
      title.to_string(),
      Money::new(price).unwrap(),
      "general".to_string(),
    );
    self.items.lock().unwrap().push(item.clone());
    item
  }
}

#[async_trait]
impl CompanyRepository for InMemoryCatalog {
  async fn create(&self, company: Company) -> Result<Company, CatalogError> {
    self.companies.lock().unwrap().push(company.clone());
    Ok(company)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CatalogError> {
    Ok(
      self
        .companies
        .lock()
        .unwrap()
        .iter()
        .find(|c| c.id == id)
        .cloned(),
    )
  }

  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<Company>, CatalogError> {
    Ok(
      self
        .companies
        .lock()
        .unwrap()
        .iter()
        .find(|c| c.bin_number.as_deref() == Some(bin.as_str()))
        .cloned(),
    )
  }

  async fn list(&self) -> Result<Vec<Company>, CatalogError> {
    Ok(self.companies.lock().unwrap().clone())
  }
}

#[async_trait]
impl ItemRepository for InMemoryCatalog {
  async fn create(&self, item: Item) -> Result<Item, CatalogError> {
    self.items.lock().unwrap().push(item.clone());
    Ok(item)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, CatalogError> {
    Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
  }

  async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, CatalogError> {
    Ok(
      self
        .items
        .lock()
        .unwrap()
        .iter()
        .filter(|i| filter.company_id.is_none_or(|id| i.company_id == id))
        .filter(|i| filter.category.as_ref().is_none_or(|c| &i.category == c))
        .cloned()
        .collect(),
    )
  }
}

#[derive(Clone, Default)]
pub struct InMemoryCommerce {
  cart: Arc<Mutex<Vec<CartItem>>>,
  orders: Arc<Mutex<Vec<Order>>>,
  payments: Arc<Mutex<Vec<Payment>>>,
}

impl InMemoryCommerce {
  pub fn payment_count(&self) -> usize {
    self.payments.lock().unwrap().len()
  }
}

#[async_trait]
impl CartRepository for InMemoryCommerce {
  async fn upsert(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    quantity: Quantity,
  ) -> Result<CartItem, CommerceError> {
    let mut cart = self.cart.lock().unwrap();
    if let Some(row) = cart
      .iter_mut()
      .find(|row| row.user_id == user_id && row.item_id == item_id)
    {
      row.quantity = quantity;
      return Ok(row.clone());
    }
    let row = CartItem {
      user_id,
      item_id,
      quantity,
      added_at: Utc::now(),
    };
    cart.push(row.clone());
    Ok(row)
  }

  async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, CommerceError> {
    let mut cart = self.cart.lock().unwrap();
    let before = cart.len();
    cart.retain(|row| !(row.user_id == user_id && row.item_id == item_id));
    Ok(cart.len() != before)
  }

  async fn list(&self, user_id: Uuid) -> Result<Vec<CartItem>, CommerceError> {
    Ok(
      self
        .cart
        .lock()
        .unwrap()
        .iter()
        .filter(|row| row.user_id == user_id)
        .cloned()
        .collect(),
    )
  }
}

#[async_trait]
impl OrderRepository for InMemoryCommerce {
  async fn place(&self, order: Order) -> Result<Order, CommerceError> {
    self
      .cart
      .lock()
      .unwrap()
      .retain(|row| row.user_id != order.user_id);
    self.orders.lock().unwrap().push(order.clone());
    Ok(order)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, CommerceError> {
    Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
  }

  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, CommerceError> {
    Ok(
      self
        .orders
        .lock()
        .unwrap()
        .iter()
        .rev()
        .filter(|o| o.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), CommerceError> {
    let mut orders = self.orders.lock().unwrap();
    let order = orders
      .iter_mut()
      .find(|o| o.id == id)
      .ok_or(CommerceError::OrderNotFound(id))?;
    order.status = status;
    Ok(())
  }
}

#[async_trait]
impl PaymentRepository for InMemoryCommerce {
  async fn create(&self, payment: Payment) -> Result<Payment, CommerceError> {
    self.payments.lock().unwrap().push(payment.clone());
    Ok(payment)
  }

  async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, CommerceError> {
    Ok(
      self
        .payments
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.user_id == user_id)
        .cloned()
        .collect(),
    )
  }
}

type SequenceKey = (Uuid, DocumentType, i32, u32);

#[derive(Clone, Default)]
pub struct InMemoryDocuments {
  documents: Arc<Mutex<Vec<BusinessDocument>>>,
  items: Arc<Mutex<Vec<DocumentItem>>>,
  sequences: Arc<Mutex<HashMap<SequenceKey, i64>>>,
  failing_updates: Arc<Mutex<Vec<Uuid>>>,
}

impl InMemoryDocuments {
  /// Makes every later `update` of this document fail like a dropped connection
  pub fn fail_updates_of(&self, id: Uuid) {
    self.failing_updates.lock().unwrap().push(id);
  }

  pub fn get(&self, id: Uuid) -> Option<BusinessDocument> {
    self
      .documents
      .lock()
      .unwrap()
      .iter()
      .find(|d| d.id == id)
      .cloned()
  }
}

#[async_trait]
impl DocumentRepository for InMemoryDocuments {
  async fn create(
    &self,
    document: BusinessDocument,
    items: Vec<DocumentItem>,
  ) -> Result<BusinessDocument, DocumentError> {
    let mut documents = self.documents.lock().unwrap();
    if documents.iter().any(|d| {
      d.seller_company_id == document.seller_company_id
        && d.document_number == document.document_number
    }) {
      return Err(DocumentError::DuplicateNumber(
        document.document_number.into_inner(),
      ));
    }
    documents.push(document.clone());
    self.items.lock().unwrap().extend(items);
    Ok(document)
  }

  async fn update(&self, document: &BusinessDocument) -> Result<(), DocumentError> {
    if self.failing_updates.lock().unwrap().contains(&document.id) {
      return Err(DocumentError::Database(sqlx::Error::PoolTimedOut));
    }
    let mut documents = self.documents.lock().unwrap();
    let stored = documents
      .iter_mut()
      .find(|d| d.id == document.id)
      .ok_or(DocumentError::DocumentNotFound(document.id))?;
    *stored = document.clone();
    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<BusinessDocument>, DocumentError> {
    Ok(self.get(id))
  }

  async fn find_items(&self, document_id: Uuid) -> Result<Vec<DocumentItem>, DocumentError> {
    let mut items: Vec<DocumentItem> = self
      .items
      .lock()
      .unwrap()
      .iter()
      .filter(|i| i.document_id == document_id)
      .cloned()
      .collect();
    items.sort_by_key(|i| i.line_order);
    Ok(items)
  }

  async fn list_by_owner(
    &self,
    owner_id: Uuid,
    filter: &DocumentFilter,
  ) -> Result<Vec<BusinessDocument>, DocumentError> {
    let mut documents: Vec<BusinessDocument> = self
      .documents
      .lock()
      .unwrap()
      .iter()
      .filter(|d| d.owner_id == owner_id)
      .filter(|d| filter.document_type.is_none_or(|t| d.document_type == t))
      .filter(|d| filter.status.is_none_or(|s| d.status == s))
      .cloned()
      .collect();
    documents.sort_by(|a, b| {
      b.document_date
        .cmp(&a.document_date)
        .then(b.created_at.cmp(&a.created_at))
    });
    Ok(documents)
  }

  async fn find_by_number(
    &self,
    seller_company_id: Option<Uuid>,
    document_number: &str,
  ) -> Result<Vec<BusinessDocument>, DocumentError> {
    Ok(
      self
        .documents
        .lock()
        .unwrap()
        .iter()
        .filter(|d| d.document_number.value() == document_number)
        .filter(|d| seller_company_id.is_none_or(|id| d.seller_company_id == id))
        .cloned()
        .collect(),
    )
  }

  async fn delete(&self, id: Uuid) -> Result<(), DocumentError> {
    self.documents.lock().unwrap().retain(|d| d.id != id);
    self.items.lock().unwrap().retain(|i| i.document_id != id);
    Ok(())
  }
}

#[async_trait]
impl DocumentSequenceRepository for InMemoryDocuments {
  async fn next_value(
    &self,
    seller_company_id: Uuid,
    document_type: DocumentType,
    year: i32,
    month: u32,
  ) -> Result<i64, DocumentError> {
    let mut sequences = self.sequences.lock().unwrap();
    let value = sequences
      .entry((seller_company_id, document_type, year, month))
      .or_insert(0);
    *value += 1;
    Ok(*value)
  }
}

#[derive(Clone, Default)]
pub struct InMemoryIntegrations {
  integrations: Arc<Mutex<Vec<Integration>>>,
}

impl InMemoryIntegrations {
  pub fn seed(&self, integration: Integration) -> Integration {
    self.integrations.lock().unwrap().push(integration.clone());
    integration
  }

  pub fn get(&self, id: Uuid) -> Option<Integration> {
    self
      .integrations
      .lock()
      .unwrap()
      .iter()
      .find(|i| i.id == id)
      .cloned()
  }
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrations {
  async fn create(&self, integration: Integration) -> Result<Integration, IntegrationError> {
    Ok(self.seed(integration))
  }

  async fn update(&self, integration: &Integration) -> Result<(), IntegrationError> {
    let mut integrations = self.integrations.lock().unwrap();
    let stored = integrations
      .iter_mut()
      .find(|i| i.id == integration.id)
      .ok_or(IntegrationError::IntegrationNotFound(integration.id))?;
    *stored = integration.clone();
    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Integration>, IntegrationError> {
    Ok(self.get(id))
  }

  async fn list(&self) -> Result<Vec<Integration>, IntegrationError> {
    Ok(self.integrations.lock().unwrap().clone())
  }

  async fn find_first_active(&self) -> Result<Option<Integration>, IntegrationError> {
    Ok(
      self
        .integrations
        .lock()
        .unwrap()
        .iter()
        .find(|i| i.is_active)
        .cloned(),
    )
  }

  async fn delete(&self, id: Uuid) -> Result<(), IntegrationError> {
    self.integrations.lock().unwrap().retain(|i| i.id != id);
    Ok(())
  }

  async fn touch_last_sync(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), IntegrationError> {
    if let Some(integration) = self
      .integrations
      .lock()
      .unwrap()
      .iter_mut()
      .find(|i| i.id == id)
    {
      integration.last_sync = Some(at);
    }
    Ok(())
  }
}

/// Sync log store that resolves ownership through the document fake
#[derive(Clone)]
pub struct InMemorySyncLogs {
  logs: Arc<Mutex<Vec<SyncLog>>>,
  documents: InMemoryDocuments,
}

impl InMemorySyncLogs {
  pub fn new(documents: InMemoryDocuments) -> Self {
    Self {
      logs: Arc::default(),
      documents,
    }
  }

  pub fn entries(&self) -> Vec<SyncLog> {
    self.logs.lock().unwrap().clone()
  }
}

#[async_trait]
impl SyncLogRepository for InMemorySyncLogs {
  async fn append(&self, log: SyncLog) -> Result<SyncLog, IntegrationError> {
    self.logs.lock().unwrap().push(log.clone());
    Ok(log)
  }

  async fn list_for_owner(
    &self,
    owner_id: Uuid,
    document_id: Option<Uuid>,
    limit: i64,
  ) -> Result<Vec<SyncLog>, IntegrationError> {
    Ok(
      self
        .entries()
        .into_iter()
        .rev()
        .filter(|log| document_id.is_none_or(|id| log.document_id == id))
        .filter(|log| {
          self
            .documents
            .get(log.document_id)
            .is_some_and(|d| d.owner_id == owner_id)
        })
        .take(limit.max(0) as usize)
        .collect(),
    )
  }
}

#[derive(Clone)]
enum StubOutcome {
  Deliver(SyncStatus, Option<String>),
  Fail(u16),
}

/// Transport provider whose transport always answers the same way
#[derive(Clone)]
pub struct StubTransports {
  outcome: StubOutcome,
  delivered: Arc<Mutex<Vec<String>>>,
}

impl StubTransports {
  pub fn delivering(status: SyncStatus, external_id: Option<&str>) -> Self {
    Self {
      outcome: StubOutcome::Deliver(status, external_id.map(str::to_string)),
      delivered: Arc::default(),
    }
  }

  pub fn failing(http_status: u16) -> Self {
    Self {
      outcome: StubOutcome::Fail(http_status),
      delivered: Arc::default(),
    }
  }

  /// Numbers of the documents handed to the transport
  pub fn delivered(&self) -> Vec<String> {
    self.delivered.lock().unwrap().clone()
  }
}

impl TransportProvider for StubTransports {
  fn transport_for(
    &self,
    _integration: &Integration,
  ) -> Result<Arc<dyn DocumentTransport>, TransportError> {
    Ok(Arc::new(self.clone()))
  }
}

#[async_trait]
impl DocumentTransport for StubTransports {
  async fn deliver(&self, payload: &ExportPayload) -> Result<DeliveryReceipt, TransportError> {
    self
      .delivered
      .lock()
      .unwrap()
      .push(payload.document_number.clone());

    match &self.outcome {
      StubOutcome::Deliver(status, external_id) => Ok(DeliveryReceipt {
        status: *status,
        message: format!("stub delivered {}", payload.document_number),
        external_id: external_id.clone(),
        file_path: None,
        response_data: Some(serde_json::json!({ "accepted": true })),
      }),
      StubOutcome::Fail(status) => Err(TransportError::Rejected {
        status: *status,
        body: "stub failure".to_string(),
      }),
    }
  }

  fn kind(&self) -> IntegrationType {
    IntegrationType::Webservice
  }
}

/// Confirmation source serving a fixed batch once
#[derive(Clone, Default)]
pub struct StubConfirmations {
  batch: Arc<Mutex<ConfirmationBatch>>,
  processed: Arc<Mutex<Vec<String>>>,
}

impl StubConfirmations {
  pub fn with_batch(batch: ConfirmationBatch) -> Self {
    Self {
      batch: Arc::new(Mutex::new(batch)),
      processed: Arc::default(),
    }
  }

  pub fn processed(&self) -> Vec<String> {
    self.processed.lock().unwrap().clone()
  }
}

#[async_trait]
impl ConfirmationSource for StubConfirmations {
  async fn pending(&self, _integration: &Integration) -> Result<ConfirmationBatch, TransportError> {
    Ok(std::mem::take(&mut *self.batch.lock().unwrap()))
  }

  async fn mark_processed(
    &self,
    _integration: &Integration,
    source: &str,
  ) -> Result<(), TransportError> {
    self.processed.lock().unwrap().push(source.to_string());
    Ok(())
  }
}

/// A two-line invoice payload with Cyrillic text
pub fn sample_payload() -> ExportPayload {
  use crate::domain::integration::{ItemPayload, PartyPayload};
  use chrono::{NaiveDate, TimeZone};
  use rust_decimal_macros::dec;

  ExportPayload {
    document_id: Uuid::nil(),
    document_type: "invoice".into(),
    onec_object: "Счет".into(),
    document_number: "INV-2025-03-0001".into(),
    document_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
    due_date: None,
    company_seller: PartyPayload {
      name: "ТОО Альфа".into(),
      bin: Some("940140000385".into()),
    },
    company_buyer: PartyPayload {
      name: "Buyer LLP".into(),
      bin: None,
    },
    items: vec![
      ItemPayload {
        line: 1,
        title: "Кабель".into(),
        quantity: 3,
        unit_price: dec!(100.00),
        total_price: dec!(300.00),
      },
      ItemPayload {
        line: 2,
        title: "Bolt".into(),
        quantity: 10,
        unit_price: dec!(2.50),
        total_price: dec!(25.00),
      },
    ],
    subtotal: dec!(325.00),
    vat_rate: dec!(12),
    vat_amount: dec!(39.00),
    total_amount: dec!(364.00),
    notes: String::new(),
    export_timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap(),
  }
}

/// AES cipher under a fixed test key
pub fn credential_cipher() -> Arc<dyn CredentialCipher> {
  use base64::{Engine as _, engine::general_purpose};
  Arc::new(
    AesCredentialEncryption::new(&general_purpose::STANDARD.encode([42u8; 32]))
      .unwrap(),
  )
}

/// Active integration with the given transport settings
pub fn sample_integration(
  integration_type: IntegrationType,
  file_format: crate::domain::integration::FileFormat,
  endpoint_url: Option<&str>,
  export_path: &str,
  import_path: &str,
) -> Integration {
  Integration::new(crate::domain::integration::IntegrationSettings {
    name: "Main 1C".into(),
    integration_type,
    endpoint_url: endpoint_url.map(str::to_string),
    username: "exchange".into(),
    password_encrypted: Some(credential_cipher().encrypt("secret").unwrap()),
    export_path: export_path.into(),
    import_path: import_path.into(),
    file_format,
    auto_sync: false,
    sync_interval_minutes: 60,
    is_active: true,
  })
}

pub mod postgres {
  use sqlx::PgPool;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};
  use uuid::Uuid;

  /// Starts a throwaway PostgreSQL and runs the migrations against it
  pub async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  pub async fn create_test_user(pool: &PgPool) -> Uuid {
    let user_id = Uuid::new_v4();
    let suffix = &user_id.simple().to_string()[..12];
    sqlx::query(
      r#"
      INSERT INTO users (id, bin_number, email, password_hash)
      VALUES ($1, $2, $3, 'hash')
      "#,
    )
    .bind(user_id)
    .bind(suffix)
    .bind(format!("test_{}@example.com", user_id))
    .execute(pool)
    .await
    .expect("Failed to create test user");
    user_id
  }

  pub async fn create_test_company(pool: &PgPool, name: &str) -> Uuid {
    let company_id = Uuid::new_v4();
    sqlx::query("INSERT INTO companies (id, name) VALUES ($1, $2)")
      .bind(company_id)
      .bind(name)
      .execute(pool)
      .await
      .expect("Failed to create test company");
    company_id
  }
}
