use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use shared::domain::{NewParty, Party, PartyId, PartyPatch};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

mod seed;

pub use seed::{load_seed_file, parse_seed};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("party {0} not found")]
    NotFound(PartyId),
    #[error("duplicate party id {0}")]
    DuplicateId(PartyId),
}

/// Access contract for the party collection.
///
/// Every call is atomic with respect to every other call on the same store.
#[async_trait]
pub trait PartyRepository: Send + Sync {
    /// All parties in insertion order.
    async fn list(&self) -> Vec<Party>;
    async fn get(&self, id: PartyId) -> Result<Party, StoreError>;
    /// Assigns a fresh id and appends the record.
    async fn create(&self, fields: NewParty) -> Party;
    async fn update(&self, id: PartyId, patch: PartyPatch) -> Result<Party, StoreError>;
    /// Removes the record and hands it back.
    async fn delete(&self, id: PartyId) -> Result<Party, StoreError>;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Clone, Default)]
pub struct MemoryPartyStore {
    parties: Arc<RwLock<Vec<Party>>>,
}

impl MemoryPartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-inserts prepared records, keeping their ids. The batch is
    /// rejected as a whole if any id repeats within it or already exists.
    pub async fn seed(&self, parties: Vec<Party>) -> Result<usize, StoreError> {
        let mut guard = self.parties.write().await;
        let mut seen: HashSet<PartyId> = guard.iter().map(|party| party.id).collect();
        for party in &parties {
            if !seen.insert(party.id) {
                return Err(StoreError::DuplicateId(party.id));
            }
        }

        let inserted = parties.len();
        guard.extend(parties);
        Ok(inserted)
    }

    fn position(parties: &[Party], id: PartyId) -> Result<usize, StoreError> {
        parties
            .iter()
            .position(|party| party.id == id)
            .ok_or_else(|| {
                debug!(%id, "party lookup missed");
                StoreError::NotFound(id)
            })
    }
}

#[async_trait]
impl PartyRepository for MemoryPartyStore {
    async fn list(&self) -> Vec<Party> {
        self.parties.read().await.clone()
    }

    async fn get(&self, id: PartyId) -> Result<Party, StoreError> {
        let guard = self.parties.read().await;
        let index = Self::position(&guard, id)?;
        Ok(guard[index].clone())
    }

    async fn create(&self, fields: NewParty) -> Party {
        let mut guard = self.parties.write().await;
        let mut id = PartyId::new_v4();
        while guard.iter().any(|party| party.id == id) {
            id = PartyId::new_v4();
        }

        let party = Party::from_new(id, fields);
        guard.push(party.clone());
        party
    }

    async fn update(&self, id: PartyId, patch: PartyPatch) -> Result<Party, StoreError> {
        let mut guard = self.parties.write().await;
        let index = Self::position(&guard, id)?;
        let party = &mut guard[index];
        party.apply(patch);
        Ok(party.clone())
    }

    async fn delete(&self, id: PartyId) -> Result<Party, StoreError> {
        let mut guard = self.parties.write().await;
        let index = Self::position(&guard, id)?;
        Ok(guard.remove(index))
    }

    async fn len(&self) -> usize {
        self.parties.read().await.len()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
