use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::auth::Bin;
use crate::domain::catalog::{
  CatalogError, Company, CompanyRepository, Item, ItemFilter, ItemRepository, Money,
};

#[derive(Debug, FromRow)]
struct CompanyRow {
  id: Uuid,
  name: String,
  bin_number: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
  fn from(row: CompanyRow) -> Self {
    Company {
      id: row.id,
      name: row.name,
      bin_number: row.bin_number,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct ItemRow {
  id: Uuid,
  company_id: Uuid,
  title: String,
  price: Decimal,
  category: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
  type Error = CatalogError;

  fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
    Ok(Item {
      id: row.id,
      company_id: row.company_id,
      title: row.title,
      price: Money::new(row.price)?,
      category: row.category,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

const COMPANY_COLUMNS: &str = "id, name, bin_number, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, company_id, title, price, category, created_at, updated_at";

pub struct PostgresCompanyRepository {
  pool: PgPool,
}

impl PostgresCompanyRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
  async fn create(&self, company: Company) -> Result<Company, CatalogError> {
    let result = sqlx::query_as::<_, CompanyRow>(&format!(
      r#"
      INSERT INTO companies (id, name, bin_number, created_at, updated_at)
      VALUES ($1, $2, $3, $4, $5)
      RETURNING {}
      "#,
      COMPANY_COLUMNS
    ))
    .bind(company.id)
    .bind(&company.name)
    .bind(company.bin_number.as_deref())
    .bind(company.created_at)
    .bind(company.updated_at)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
        CatalogError::BinAlreadyRegistered(company.bin_number.unwrap_or_default()),
      ),
      Err(e) => Err(e.into()),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, CatalogError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {} FROM companies WHERE id = $1",
      COMPANY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_bin(&self, bin: &Bin) -> Result<Option<Company>, CatalogError> {
    let row = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {} FROM companies WHERE bin_number = $1",
      COMPANY_COLUMNS
    ))
    .bind(bin.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn list(&self) -> Result<Vec<Company>, CatalogError> {
    let rows = sqlx::query_as::<_, CompanyRow>(&format!(
      "SELECT {} FROM companies ORDER BY name ASC",
      COMPANY_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}

pub struct PostgresItemRepository {
  pool: PgPool,
}

impl PostgresItemRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
  async fn create(&self, item: Item) -> Result<Item, CatalogError> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
      r#"
      INSERT INTO items (id, company_id, title, price, category, created_at, updated_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7)
      RETURNING {}
      "#,
      ITEM_COLUMNS
    ))
    .bind(item.id)
    .bind(item.company_id)
    .bind(&item.title)
    .bind(item.price.amount())
    .bind(&item.category)
    .bind(item.created_at)
    .bind(item.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, CatalogError> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
      "SELECT {} FROM items WHERE id = $1",
      ITEM_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, CatalogError> {
    let mut query: QueryBuilder<Postgres> =
      QueryBuilder::new(format!("SELECT {} FROM items WHERE TRUE", ITEM_COLUMNS));

    if let Some(company_id) = filter.company_id {
      query.push(" AND company_id = ").push_bind(company_id);
    }
    if let Some(category) = &filter.category {
      query.push(" AND category = ").push_bind(category.clone());
    }
    query.push(" ORDER BY title ASC");

    let rows = query
      .build_query_as::<ItemRow>()
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
