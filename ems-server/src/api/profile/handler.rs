//! Profile Handlers
//!
//! Contact fields are the only self-editable part of a profile.

use axum::{Json, extract::State};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Profile, ProfileContactUpdate};
use crate::db::repository::ProfileRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};

/// Update the caller's contact fields
pub async fn update_contact(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileContactUpdate>,
) -> AppResult<Json<Profile>> {
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(
        &payload.emergency_contact,
        "emergency_contact",
        MAX_SHORT_TEXT_LEN,
    )?;

    let log = NewActivity::new(ActivityAction::ProfileUpdated, "profile")
        .actor(user.id.clone(), user.username.clone())
        .entity_id(user.id.clone())
        .details(serde_json::json!({
            "fields": contact_field_names(&payload),
        }));

    let repo = ProfileRepository::new(state.db.clone());
    let profile = repo
        .update_contact(&user.id, payload, log)
        .await
        .map_err(AppError::from)?;

    Ok(Json(profile))
}

fn contact_field_names(payload: &ProfileContactUpdate) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if payload.phone.is_some() {
        fields.push("phone");
    }
    if payload.address.is_some() {
        fields.push("address");
    }
    if payload.emergency_contact.is_some() {
        fields.push("emergency_contact");
    }
    fields
}
