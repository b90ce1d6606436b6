use serde::{Deserialize, Serialize};

use crate::domain::PartyId;

/// Body returned by a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}

impl DeleteAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub fn parties_route() -> &'static str {
    "/parties"
}

pub fn party_route(id: PartyId) -> String {
    format!("{}/{id}", parties_route())
}
