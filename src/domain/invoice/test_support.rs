//! In-memory stand-ins for the invoice ports, shared by unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::form::{FormData, InvoiceFields};
use super::ports::{CacheError, CachedView, InvoiceRepository, Navigator, ViewCache};
use super::value_objects::InvoiceId;

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
  rows: Mutex<Vec<Invoice>>,
  fail_writes: bool,
}

impl InMemoryInvoiceRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every write fails as if the database were unreachable.
  pub fn failing() -> Self {
    Self {
      rows: Mutex::new(Vec::new()),
      fail_writes: true,
    }
  }

  pub fn with_rows(rows: Vec<Invoice>) -> Self {
    Self {
      rows: Mutex::new(rows),
      fail_writes: false,
    }
  }

  pub fn rows(&self) -> Vec<Invoice> {
    self.rows.lock().unwrap().clone()
  }

  fn check_writable(&self) -> Result<(), InvoiceError> {
    if self.fail_writes {
      return Err(InvoiceError::Persistence(sqlx::Error::PoolTimedOut));
    }
    Ok(())
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    self.check_writable()?;
    self.rows.lock().unwrap().push(invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError> {
    self.check_writable()?;
    let mut rows = self.rows.lock().unwrap();
    let mut matched = 0;
    for row in rows.iter_mut().filter(|r| &r.id == id) {
      row.apply(fields.clone());
      matched += 1;
    }
    Ok(matched)
  }

  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError> {
    self.check_writable()?;
    let mut rows = self.rows.lock().unwrap();
    let before = rows.len();
    rows.retain(|r| &r.id != id);
    Ok((before - rows.len()) as u64)
  }

  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError> {
    Ok(self.rows.lock().unwrap().iter().find(|r| &r.id == id).cloned())
  }

  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
    Ok(self.rows())
  }
}

/// Keeps bodies per generation, the way the Redis cache does.
#[derive(Default)]
pub struct RecordingViewCache {
  pub revalidated: Mutex<Vec<String>>,
  generations: Mutex<HashMap<String, u64>>,
  entries: Mutex<HashMap<(String, u64), String>>,
  fail: bool,
}

impl RecordingViewCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Self::default()
    }
  }

  pub fn revalidated(&self) -> Vec<String> {
    self.revalidated.lock().unwrap().clone()
  }

  fn generation(&self, path: &str) -> u64 {
    self
      .generations
      .lock()
      .unwrap()
      .get(path)
      .copied()
      .unwrap_or(0)
  }
}

#[async_trait]
impl ViewCache for RecordingViewCache {
  async fn lookup(&self, path: &str) -> Result<CachedView, CacheError> {
    let generation = self.generation(path);
    let body = self
      .entries
      .lock()
      .unwrap()
      .get(&(path.to_string(), generation))
      .cloned();

    Ok(match body {
      Some(body) => CachedView::Hit(body),
      None => CachedView::Miss { generation },
    })
  }

  async fn put(&self, path: &str, generation: u64, body: &str) -> Result<(), CacheError> {
    self
      .entries
      .lock()
      .unwrap()
      .insert((path.to_string(), generation), body.to_string());
    Ok(())
  }

  async fn revalidate(&self, path: &str) -> Result<(), CacheError> {
    self.revalidated.lock().unwrap().push(path.to_string());
    *self
      .generations
      .lock()
      .unwrap()
      .entry(path.to_string())
      .or_insert(0) += 1;
    if self.fail {
      return Err(CacheError::Backend("connection reset".to_string()));
    }
    Ok(())
  }
}

#[derive(Default)]
pub struct RecordingNavigator {
  pub locations: Mutex<Vec<String>>,
}

impl RecordingNavigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn locations(&self) -> Vec<String> {
    self.locations.lock().unwrap().clone()
  }
}

impl Navigator for RecordingNavigator {
  fn redirect(&self, location: &str) {
    self.locations.lock().unwrap().push(location.to_string());
  }
}

pub fn form(pairs: &[(&str, &str)]) -> FormData {
  pairs.iter().map(|(k, v)| (*k, *v)).collect()
}
