use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::domain::invoice::{
  AmountInCents, CustomerId, Invoice, InvoiceFields, InvoiceId, InvoiceStatus, ValueObjectError,
  errors::InvoiceError, ports::InvoiceRepository,
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: String,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    // A row that fails these checks is corrupt storage, not bad user input
    let decode = |e: ValueObjectError| InvoiceError::Persistence(sqlx::Error::Decode(Box::new(e)));

    Ok(Invoice {
      id: InvoiceId::new(row.id).map_err(decode)?,
      customer_id: CustomerId::new(row.customer_id).map_err(decode)?,
      amount: AmountInCents::from_cents(row.amount),
      status: InvoiceStatus::from_str(&row.status).map_err(decode)?,
      date: row.date,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, amount, status, date
            "#,
    )
    .bind(invoice.id.value())
    .bind(invoice.customer_id.value())
    .bind(invoice.amount.cents())
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to insert invoice: {}", e);
      InvoiceError::Persistence(e)
    })?;

    row.try_into()
  }

  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = $2, amount = $3, status = $4
            WHERE id = $1
            "#,
    )
    .bind(id.value())
    .bind(fields.customer_id.value())
    .bind(fields.amount.cents())
    .bind(fields.status.as_str())
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update invoice {}: {}", id, e);
      InvoiceError::Persistence(e)
    })?;

    Ok(result.rows_affected())
  }

  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
      DELETE FROM invoices
      WHERE id = $1
      "#,
    )
    .bind(id.value())
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete invoice {}: {}", id, e);
      InvoiceError::Persistence(e)
    })?;

    Ok(result.rows_affected())
  }

  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id.value())
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
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

  fn fields(customer: &str, cents: i64, status: InvoiceStatus) -> InvoiceFields {
    InvoiceFields {
      customer_id: CustomerId::new(customer).unwrap(),
      amount: AmountInCents::from_cents(cents),
      status,
    }
  }

  #[tokio::test]
  async fn test_create_invoice() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let invoice = Invoice::new(fields("c1", 4550, InvoiceStatus::Pending), date);

    let created = repo.create(invoice.clone()).await.unwrap();
    assert_eq!(created, invoice);

    let found = repo.find_by_id(&invoice.id).await.unwrap();
    assert_eq!(found, Some(invoice));
  }

  #[tokio::test]
  async fn test_update_leaves_date_alone() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let invoice = repo
      .create(Invoice::new(fields("c1", 100, InvoiceStatus::Pending), date))
      .await
      .unwrap();

    let rows = repo
      .update(&invoice.id, &fields("c2", 1000, InvoiceStatus::Paid))
      .await
      .unwrap();
    assert_eq!(rows, 1);

    let updated = repo.find_by_id(&invoice.id).await.unwrap().unwrap();
    assert_eq!(updated.customer_id.value(), "c2");
    assert_eq!(updated.amount.cents(), 1000);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, date);
  }

  #[tokio::test]
  async fn test_update_unknown_id_matches_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let rows = repo
      .update(
        &InvoiceId::new("inv_1").unwrap(),
        &fields("c1", 1000, InvoiceStatus::Paid),
      )
      .await
      .unwrap();
    assert_eq!(rows, 0);
  }

  #[tokio::test]
  async fn test_delete_twice() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let invoice = repo
      .create(Invoice::new(
        fields("c1", 100, InvoiceStatus::Pending),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      ))
      .await
      .unwrap();

    assert_eq!(repo.delete(&invoice.id).await.unwrap(), 1);
    assert_eq!(repo.delete(&invoice.id).await.unwrap(), 0);
    assert!(repo.find_by_id(&invoice.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_find_all_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    for (day, customer) in [(1, "old"), (20, "new")] {
      repo
        .create(Invoice::new(
          fields(customer, 100, InvoiceStatus::Pending),
          NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        ))
        .await
        .unwrap();
    }

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].customer_id.value(), "new");
    assert_eq!(all[1].customer_id.value(), "old");
  }

  #[tokio::test]
  async fn test_status_check_constraint() {
    let (pool, _container) = setup_test_db().await;

    let result = sqlx::query(
      "INSERT INTO invoices (id, customer_id, amount, status, date) VALUES ('x', 'c1', 1, 'overdue', CURRENT_DATE)",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err());
  }
}
