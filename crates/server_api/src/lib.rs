use std::sync::Arc;

use shared::{
    domain::{NewParty, Party, PartyId, PartyPatch},
    error::{ApiError, ErrorCode},
    protocol::DeleteAck,
};
use storage::{PartyRepository, StoreError};
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn PartyRepository>,
}

impl ApiContext {
    pub fn new(store: impl PartyRepository + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub async fn list_parties(ctx: &ApiContext) -> Vec<Party> {
    ctx.store.list().await
}

pub async fn get_party(ctx: &ApiContext, id: PartyId) -> Result<Party, ApiError> {
    ctx.store.get(id).await.map_err(store_error)
}

pub async fn create_party(ctx: &ApiContext, fields: NewParty) -> Party {
    let party = ctx.store.create(fields).await;
    info!(party_id = %party.id, name = %party.name, "party created");
    party
}

pub async fn update_party(
    ctx: &ApiContext,
    id: PartyId,
    patch: PartyPatch,
) -> Result<Party, ApiError> {
    let party = ctx.store.update(id, patch).await.map_err(store_error)?;
    info!(party_id = %id, "party updated");
    Ok(party)
}

pub async fn delete_party(ctx: &ApiContext, id: PartyId) -> Result<DeleteAck, ApiError> {
    ctx.store.delete(id).await.map_err(store_error)?;
    info!(party_id = %id, "party deleted");
    Ok(DeleteAck::ok())
}

/// Resolves a raw path segment. A segment that is not a party id cannot name
/// any record, so it is reported the same way as a missing one.
pub fn parse_party_id(raw: &str) -> Result<PartyId, ApiError> {
    raw.parse::<PartyId>()
        .map_err(|_| ApiError::not_found(format!("party {raw} not found")))
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::not_found(err.to_string()),
        StoreError::DuplicateId(_) => ApiError::new(ErrorCode::Validation, err.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
