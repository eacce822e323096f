use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::catalog::{Money, Quantity};
use crate::domain::document::{
  BusinessDocument, DocumentError, DocumentFilter, DocumentItem, DocumentNumber,
  DocumentRepository, DocumentSequenceRepository, DocumentType, VatRate,
};

#[derive(Debug, FromRow)]
struct DocumentRow {
  id: Uuid,
  owner_id: Uuid,
  document_type: String,
  order_id: Uuid,
  seller_company_id: Uuid,
  buyer_company_id: Uuid,
  document_number: String,
  document_date: NaiveDate,
  due_date: Option<NaiveDate>,
  subtotal: Decimal,
  vat_rate: Decimal,
  vat_amount: Decimal,
  total_amount: Decimal,
  status: String,
  notes: String,
  external_id: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for BusinessDocument {
  type Error = DocumentError;

  fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
    Ok(BusinessDocument {
      id: row.id,
      owner_id: row.owner_id,
      document_type: row.document_type.parse()?,
      order_id: row.order_id,
      seller_company_id: row.seller_company_id,
      buyer_company_id: row.buyer_company_id,
      document_number: DocumentNumber::parse(&row.document_number)?,
      document_date: row.document_date,
      due_date: row.due_date,
      subtotal: Money::new(row.subtotal)?,
      vat_rate: VatRate::new(row.vat_rate)?,
      vat_amount: Money::new(row.vat_amount)?,
      total_amount: Money::new(row.total_amount)?,
      status: row.status.parse()?,
      notes: row.notes,
      external_id: row.external_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct DocumentItemRow {
  id: Uuid,
  document_id: Uuid,
  item_id: Option<Uuid>,
  title: String,
  quantity: i32,
  unit_price: Decimal,
  total_price: Decimal,
  line_order: i32,
}

impl TryFrom<DocumentItemRow> for DocumentItem {
  type Error = DocumentError;

  fn try_from(row: DocumentItemRow) -> Result<Self, Self::Error> {
    Ok(DocumentItem {
      id: row.id,
      document_id: row.document_id,
      item_id: row.item_id,
      title: row.title,
      quantity: Quantity::new(row.quantity)?,
      unit_price: Money::new(row.unit_price)?,
      total_price: Money::new(row.total_price)?,
      line_order: row.line_order,
    })
  }
}

const DOCUMENT_COLUMNS: &str = "id, owner_id, document_type, order_id, seller_company_id, \
  buyer_company_id, document_number, document_date, due_date, subtotal, vat_rate, vat_amount, \
  total_amount, status, notes, external_id, created_at, updated_at";

pub struct PostgresDocumentRepository {
  pool: PgPool,
}

impl PostgresDocumentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
  async fn create(
    &self,
    document: BusinessDocument,
    items: Vec<DocumentItem>,
  ) -> Result<BusinessDocument, DocumentError> {
    let mut tx = self.pool.begin().await?;

    let inserted = sqlx::query(
      r#"
      INSERT INTO business_documents (
          id, owner_id, document_type, order_id, seller_company_id, buyer_company_id,
          document_number, document_date, due_date, subtotal, vat_rate, vat_amount,
          total_amount, status, notes, external_id, created_at, updated_at
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
      "#,
    )
    .bind(document.id)
    .bind(document.owner_id)
    .bind(document.document_type.as_str())
    .bind(document.order_id)
    .bind(document.seller_company_id)
    .bind(document.buyer_company_id)
    .bind(document.document_number.value())
    .bind(document.document_date)
    .bind(document.due_date)
    .bind(document.subtotal.amount())
    .bind(document.vat_rate.value())
    .bind(document.vat_amount.amount())
    .bind(document.total_amount.amount())
    .bind(document.status.as_str())
    .bind(&document.notes)
    .bind(document.external_id.as_deref())
    .bind(document.created_at)
    .bind(document.updated_at)
    .execute(&mut *tx)
    .await;

    match inserted {
      Ok(_) => {}
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        return Err(DocumentError::DuplicateNumber(
          document.document_number.into_inner(),
        ));
      }
      Err(e) => return Err(e.into()),
    }

    for item in &items {
      sqlx::query(
        r#"
        INSERT INTO document_items (id, document_id, item_id, title, quantity, unit_price, total_price, line_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
      )
      .bind(item.id)
      .bind(item.document_id)
      .bind(item.item_id)
      .bind(&item.title)
      .bind(item.quantity.value())
      .bind(item.unit_price.amount())
      .bind(item.total_price.amount())
      .bind(item.line_order)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;

    Ok(document)
  }

  async fn update(&self, document: &BusinessDocument) -> Result<(), DocumentError> {
    let result = sqlx::query(
      r#"
      UPDATE business_documents
      SET due_date = $2, notes = $3, status = $4, external_id = $5, updated_at = $6
      WHERE id = $1
      "#,
    )
    .bind(document.id)
    .bind(document.due_date)
    .bind(&document.notes)
    .bind(document.status.as_str())
    .bind(document.external_id.as_deref())
    .bind(document.updated_at)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(DocumentError::DocumentNotFound(document.id));
    }
    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<BusinessDocument>, DocumentError> {
    let row = sqlx::query_as::<_, DocumentRow>(&format!(
      "SELECT {} FROM business_documents WHERE id = $1",
      DOCUMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_items(&self, document_id: Uuid) -> Result<Vec<DocumentItem>, DocumentError> {
    let rows = sqlx::query_as::<_, DocumentItemRow>(
      r#"
      SELECT id, document_id, item_id, title, quantity, unit_price, total_price, line_order
      FROM document_items
      WHERE document_id = $1
      ORDER BY line_order ASC
      "#,
    )
    .bind(document_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn list_by_owner(
    &self,
    owner_id: Uuid,
    filter: &DocumentFilter,
  ) -> Result<Vec<BusinessDocument>, DocumentError> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
      "SELECT {} FROM business_documents WHERE owner_id = ",
      DOCUMENT_COLUMNS
    ));
    query.push_bind(owner_id);

    if let Some(document_type) = filter.document_type {
      query
        .push(" AND document_type = ")
        .push_bind(document_type.as_str());
    }
    if let Some(status) = filter.status {
      query.push(" AND status = ").push_bind(status.as_str());
    }
    query.push(" ORDER BY document_date DESC, created_at DESC");

    let rows = query
      .build_query_as::<DocumentRow>()
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn find_by_number(
    &self,
    seller_company_id: Option<Uuid>,
    document_number: &str,
  ) -> Result<Vec<BusinessDocument>, DocumentError> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
      "SELECT {} FROM business_documents WHERE document_number = ",
      DOCUMENT_COLUMNS
    ));
    query.push_bind(document_number.to_string());

    if let Some(seller_company_id) = seller_company_id {
      query
        .push(" AND seller_company_id = ")
        .push_bind(seller_company_id);
    }

    let rows = query
      .build_query_as::<DocumentRow>()
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<(), DocumentError> {
    let result = sqlx::query("DELETE FROM business_documents WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await;

    match result {
      Ok(done) if done.rows_affected() == 0 => Err(DocumentError::DocumentNotFound(id)),
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
        DocumentError::CannotDelete("document has sync history".to_string()),
      ),
      Err(e) => Err(e.into()),
    }
  }
}

pub struct PostgresDocumentSequenceRepository {
  pool: PgPool,
}

impl PostgresDocumentSequenceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl DocumentSequenceRepository for PostgresDocumentSequenceRepository {
  async fn next_value(
    &self,
    seller_company_id: Uuid,
    document_type: DocumentType,
    year: i32,
    month: u32,
  ) -> Result<i64, DocumentError> {
    // The row lock taken by ON CONFLICT serializes concurrent callers
    let value: i64 = sqlx::query_scalar(
      r#"
      INSERT INTO document_sequences (seller_company_id, document_type, period_year, period_month, last_value)
      VALUES ($1, $2, $3, $4, 1)
      ON CONFLICT (seller_company_id, document_type, period_year, period_month)
      DO UPDATE SET last_value = document_sequences.last_value + 1
      RETURNING last_value
      "#,
    )
    .bind(seller_company_id)
    .bind(document_type.as_str())
    .bind(year)
    .bind(month as i32)
    .fetch_one(&self.pool)
    .await?;

    Ok(value)
  }
}
