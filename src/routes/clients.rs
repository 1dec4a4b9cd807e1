use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Client, CreateClientRequest, ImportClientsResponse, UpdateClientRequest},
    queries::client_queries,
    utils::{contacts::parse_contact_line, extractors::read_file_field},
};

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>> {
    let clients = client_queries::find_all(&state.db).await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>> {
    let client = client_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Cliente {} no encontrado", id)))?;

    Ok(Json(client))
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("El nombre es obligatorio".to_string()));
    }

    if payload.phone.trim().is_empty() {
        return Err(AppError::BadRequest("El teléfono es obligatorio".to_string()));
    }

    let client = client_queries::create_client(&state.db, &payload).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<Client>> {
    let client = client_queries::update_client(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Cliente {} no encontrado", id)))?;

    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    if !client_queries::delete_client(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Cliente {} no encontrado", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Imports a plain-text contact list, one contact per line.
pub async fn import_clients(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportClientsResponse>> {
    let bytes = read_file_field(&mut multipart, "file").await?;
    let content = String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest("El archivo debe ser texto UTF-8".to_string()))?;

    let mut contacts = Vec::new();
    let mut errors = Vec::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_contact_line(line) {
            Some(contact) => contacts.push(contact),
            None => errors.push(format!("No se pudo interpretar la línea \"{}\"", line)),
        }
    }

    let imported = client_queries::create_batch(&state.db, &contacts).await?;
    tracing::info!(
        "Imported {} clients from {} lines ({} unparsed)",
        imported,
        contacts.len() + errors.len(),
        errors.len()
    );

    Ok(Json(ImportClientsResponse { imported, errors }))
}
