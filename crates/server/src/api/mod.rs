use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use server_api::{
    create_party, delete_party, get_party, list_parties, parse_party_id, update_party,
};
use shared::{
    domain::{NewParty, Party, PartyPatch},
    error::{ApiError, ErrorCode},
    protocol::DeleteAck,
};

use crate::app_state::AppState;

pub type HttpError = (StatusCode, Json<ApiError>);

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn http_list_parties(State(state): State<Arc<AppState>>) -> Json<Vec<Party>> {
    Json(list_parties(&state.api).await)
}

pub async fn http_create_party(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewParty>, JsonRejection>,
) -> Result<(StatusCode, Json<Party>), HttpError> {
    let fields = json_body(body)?;
    let party = create_party(&state.api, fields).await;
    Ok((StatusCode::CREATED, Json(party)))
}

pub async fn http_get_party(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Party>, HttpError> {
    let id = parse_party_id(&raw_id).map_err(reject)?;
    let party = get_party(&state.api, id).await.map_err(reject)?;
    Ok(Json(party))
}

pub async fn http_update_party(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<PartyPatch>, JsonRejection>,
) -> Result<Json<Party>, HttpError> {
    let id = parse_party_id(&raw_id).map_err(reject)?;
    let patch = json_body(body)?;
    let party = update_party(&state.api, id, patch).await.map_err(reject)?;
    Ok(Json(party))
}

pub async fn http_delete_party(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteAck>, HttpError> {
    let id = parse_party_id(&raw_id).map_err(reject)?;
    let ack = delete_party(&state.api, id).await.map_err(reject)?;
    Ok(Json(ack))
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    }
}

fn reject(err: ApiError) -> HttpError {
    (status_for(err.code), Json(err))
}

// Keeps axum's status for body errors but answers with the usual error envelope.
fn json_body<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err((
            rejection.status(),
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )),
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
