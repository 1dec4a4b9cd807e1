use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::{
    error::Result,
    models::{Client, CreateClientRequest, UpdateClientRequest},
};

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Client>> {
    let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    Ok(clients)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(client)
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE phone = ?")
        .bind(phone)
        .fetch_optional(pool)
        .await?;

    Ok(client)
}

pub async fn create_client(pool: &SqlitePool, req: &CreateClientRequest) -> Result<Client> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (name, phone, email, rubro, company, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.phone)
    .bind(&req.email)
    .bind(&req.rubro)
    .bind(&req.company)
    .bind(&req.notes)
    .fetch_one(pool)
    .await?;

    Ok(client)
}

/// Applies only the supplied fields. Returns `None` when the client does not exist.
pub async fn update_client(
    pool: &SqlitePool,
    id: i64,
    req: &UpdateClientRequest,
) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
        SET
            name = COALESCE(?, name),
            phone = COALESCE(?, phone),
            email = COALESCE(?, email),
            rubro = COALESCE(?, rubro),
            company = COALESCE(?, company),
            notes = COALESCE(?, notes),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.phone)
    .bind(&req.email)
    .bind(&req.rubro)
    .bind(&req.company)
    .bind(&req.notes)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

pub async fn delete_client(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Inserts the batch in one transaction, skipping phones that already exist
/// (in the table or earlier in the batch). Returns how many were inserted.
pub async fn create_batch(pool: &SqlitePool, clients: &[CreateClientRequest]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut seen = HashSet::new();
    let mut inserted = 0;

    for client in clients {
        if !seen.insert(client.phone.as_str()) {
            continue;
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE phone = ?")
            .bind(&client.phone)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_some() {
            tracing::debug!("Skipping existing client phone {}", client.phone);
            continue;
        }

        sqlx::query(
            "INSERT INTO clients (name, phone, email, rubro, company, notes) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.rubro)
        .bind(&client.company)
        .bind(&client.notes)
        .execute(&mut *tx)
        .await?;

        inserted += 1;
    }

    tx.commit().await?;

    Ok(inserted)
}
