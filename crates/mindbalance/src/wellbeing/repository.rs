use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{CheckInRecord, Resource, UserProfile};
use super::store::{Collection, DocumentStore, StoreError};
use super::suggestions::SuggestionRule;

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersDocument {
    #[serde(default)]
    users: Vec<UserProfile>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CheckInsDocument {
    #[serde(default)]
    checkins: Vec<CheckInRecord>,
    /// Other top-level keys, written back untouched on append.
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SuggestionsDocument {
    #[serde(default)]
    suggestions: Vec<SuggestionRule>,
}

/// Resource library plus its ordered category list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Typed view over the raw collections of a [`DocumentStore`].
pub struct WellbeingRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for WellbeingRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> WellbeingRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn users(&self) -> Result<Vec<UserProfile>, StoreError> {
        let document: UsersDocument = self.read(Collection::Users)?;
        Ok(document.users)
    }

    /// Every stored check-in, in stored (submission) order.
    pub fn check_ins(&self) -> Result<Vec<CheckInRecord>, StoreError> {
        let document: CheckInsDocument = self.read(Collection::CheckIns)?;
        Ok(document.checkins)
    }

    /// Read the whole collection, append one record and write it all back.
    pub fn append_check_in(&self, record: CheckInRecord) -> Result<(), StoreError> {
        let mut document: CheckInsDocument = self.read(Collection::CheckIns)?;
        document.checkins.push(record);
        self.write(Collection::CheckIns, &document)
    }

    pub fn suggestion_rules(&self) -> Result<Vec<SuggestionRule>, StoreError> {
        let document: SuggestionsDocument = self.read(Collection::SuggestionRules)?;
        Ok(document.suggestions)
    }

    pub fn resource_catalog(&self) -> Result<ResourceCatalog, StoreError> {
        self.read(Collection::Resources)
    }

    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<T, StoreError> {
        let raw = self.store.load(collection)?;
        serde_json::from_value(raw).map_err(|source| StoreError::Malformed {
            collection: collection.key(),
            source,
        })
    }

    fn write<T: Serialize>(&self, collection: Collection, document: &T) -> Result<(), StoreError> {
        let value: Value =
            serde_json::to_value(document).map_err(|source| StoreError::Malformed {
                collection: collection.key(),
                source,
            })?;
        self.store.save(collection, value)
    }
}
