// ============================
// crates/backend-lib/src/handlers/chirps.rs
// ============================
//! Chirp endpoints.
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chirpy_common::{ChirpResponse, CreateChirpRequest, ListChirpsQuery, SortOrder};
use metrics::counter;
use uuid::Uuid;

use super::extract::AuthUser;
use crate::error::AppError;
use crate::metrics::{CHIRP_CREATED, CHIRP_DELETED};
use crate::storage::Storage;
use crate::AppState;

/// Longest chirp body, in characters
pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSORED: &str = "****";

/// Replace every occurrence of a profane word with `****`.
///
/// Matching is ASCII case-insensitive and ignores word boundaries, so
/// `Sharbert!` and `fornaxes` are censored too.
pub fn clean_body(body: &str) -> String {
    let mut cleaned = body.to_string();
    for word in PROFANE_WORDS {
        while let Some(start) = find_ignore_ascii_case(&cleaned, word) {
            cleaned.replace_range(start..start + word.len(), CENSORED);
        }
    }
    cleaned
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        haystack
            .get(i..i + needle.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(needle))
    })
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("invalid {what}")))
}

/// `POST /api/chirps`
pub async fn create_chirp<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<ChirpResponse>), AppError> {
    if request.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::InvalidInput("Chirp is too long".into()));
    }

    let chirp = state
        .storage
        .create_chirp(user_id, &clean_body(&request.body))
        .await?;

    counter!(CHIRP_CREATED).increment(1);
    tracing::debug!(chirp_id = %chirp.id, %user_id, "chirp created");
    Ok((StatusCode::CREATED, Json((&chirp).into())))
}

/// `GET /api/chirps?author_id=&sort=`
pub async fn list_chirps<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<Json<Vec<ChirpResponse>>, AppError> {
    let author_id = query
        .author_id
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_id(raw, "author_id"))
        .transpose()?;

    let mut chirps = state.storage.list_chirps(author_id).await?;
    match SortOrder::parse_lenient(query.sort.as_deref()) {
        SortOrder::Asc => chirps.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    Ok(Json(chirps.iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{chirp_id}`
pub async fn get_chirp<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(chirp_id): Path<String>,
) -> Result<Json<ChirpResponse>, AppError> {
    let chirp_id = parse_id(&chirp_id, "chirp id")?;
    let chirp = state
        .storage
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".into()))?;
    Ok(Json((&chirp).into()))
}

/// `DELETE /api/chirps/{chirp_id}`: authors only
pub async fn delete_chirp<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let chirp_id = parse_id(&chirp_id, "chirp id")?;
    let chirp = state
        .storage
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".into()))?;
    if chirp.user_id != user_id {
        return Err(AppError::Forbidden("not the author of this chirp".into()));
    }

    state.storage.delete_chirp(chirp_id).await?;
    counter!(CHIRP_DELETED).increment(1);
    tracing::debug!(%chirp_id, %user_id, "chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_body() {
        assert_eq!(
            clean_body("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            clean_body("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            clean_body("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
    }

    #[test]
    fn test_clean_body_censors_inside_words() {
        assert_eq!(clean_body("Sharbert!"), "****!");
        assert_eq!(clean_body("kerfuffle."), "****.");
        assert_eq!(clean_body("fornaxes"), "****es");
        assert_eq!(clean_body("KerFuffleSHARBERT"), "********");
    }

    #[test]
    fn test_clean_body_handles_multibyte_text() {
        assert_eq!(clean_body("héllo fornax ✓"), "héllo **** ✓");
    }

    #[test]
    fn test_clean_body_keeps_spacing() {
        assert_eq!(clean_body("a  kerfuffle "), "a  **** ");
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("not-a-uuid", "chirp id").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "chirp id").unwrap(), id);
    }
}
