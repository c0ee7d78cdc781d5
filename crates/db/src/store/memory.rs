//! In-memory record store.
//!
//! Holds documents in a `BTreeMap` keyed by id, which gives the same byte-wise
//! id ordering as the PostgreSQL store. Availability can be toggled to
//! exercise connection-failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use catalog_core::product::{ProductDocument, ProductFields};
use catalog_core::types::RecordId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{ProductFilter, ProductQuery, ProductStore};

pub struct MemoryProductStore {
    docs: RwLock<BTreeMap<RecordId, ProductFields>>,
    available: AtomicBool,
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the connection. While unavailable every
    /// operation fails with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Write a document without any checks, as a pre-existing record would
    /// have been.
    pub async fn seed(&self, doc: ProductDocument) {
        self.docs.write().await.insert(doc.id, doc.fields);
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::from_sqlx(sqlx::Error::PoolClosed))
        }
    }
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(if n < 0 { 0 } else { usize::MAX })
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<ProductDocument>, StoreError> {
        self.check_available()?;
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|(_, fields)| match &query.filter {
                ProductFilter::All => true,
                ProductFilter::TagTitle(title) => fields.has_tag(title),
            })
            .skip(to_usize(query.skip))
            .take(to_usize(query.take))
            .map(|(id, fields)| ProductDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProductDocument>, StoreError> {
        self.check_available()?;
        let docs = self.docs.read().await;
        Ok(docs.get(id).map(|fields| ProductDocument {
            id: id.to_string(),
            fields: fields.clone(),
        }))
    }

    async fn insert(&self, doc: &ProductDocument) -> Result<ProductDocument, StoreError> {
        self.check_available()?;
        let mut docs = self.docs.write().await;
        if docs.contains_key(&doc.id) {
            return Err(StoreError::DuplicateId(doc.id.clone()));
        }
        docs.insert(doc.id.clone(), doc.fields.clone());
        Ok(doc.clone())
    }

    async fn replace(&self, doc: &ProductDocument) -> Result<Option<ProductDocument>, StoreError> {
        self.check_available()?;
        let mut docs = self.docs.write().await;
        match docs.get_mut(&doc.id) {
            Some(fields) => {
                *fields = doc.fields.clone();
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(u64::from(self.docs.write().await.remove(id).is_some()))
    }
}
