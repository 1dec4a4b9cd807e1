use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{GeneratedMessages, MessageGenerationInput},
    services::message_service,
};

pub async fn generate_messages(
    State(state): State<AppState>,
    Json(payload): Json<MessageGenerationInput>,
) -> Result<Json<GeneratedMessages>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("La cotización no tiene productos".to_string()));
    }

    let messages = message_service::generate_messages(&state.db, &state.rates, &payload).await?;

    Ok(Json(messages))
}
