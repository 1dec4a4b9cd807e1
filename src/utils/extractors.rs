use axum::extract::Multipart;

use crate::error::{AppError, Result};

/// Reads the named file field from a multipart body. Missing or empty uploads
/// are rejected.
pub async fn read_file_field(multipart: &mut Multipart, field_name: &str) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Formulario inválido: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Error leyendo el archivo: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("El archivo está vacío".to_string()));
        }

        return Ok(bytes.to_vec());
    }

    Err(AppError::BadRequest("No se recibió ningún archivo".to_string()))
}
