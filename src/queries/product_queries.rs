use std::collections::HashMap;

use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::{AppError, Result},
    models::{CreateProductRequest, ParsedProductRow, Product},
    utils::hash::{CatalogEntry, catalog_hash},
};

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY updated_at DESC, id DESC")
            .fetch_all(pool)
            .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Batch lookup keyed by product id; unknown ids are simply absent.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<HashMap<i64, Product>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query_builder = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE id IN (");
    let mut separated = query_builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let products = query_builder
        .build_query_as::<Product>()
        .fetch_all(pool)
        .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn find_all_ordered_by_code<'e, E>(executor: E) -> Result<Vec<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY code ASC")
        .fetch_all(executor)
        .await?;

    Ok(products)
}

pub async fn create_product<'e, E>(executor: E, req: &CreateProductRequest) -> Result<Product>
where
    E: Executor<'e, Database = Sqlite>,
{
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            code, name, category, price_usd, iva_included,
            description, provider, origin, price_alt_usd, sheet
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&req.code)
    .bind(&req.name)
    .bind(&req.category)
    .bind(req.price_usd)
    .bind(req.iva_included)
    .bind(&req.description)
    .bind(&req.provider)
    .bind(&req.origin)
    .bind(req.price_alt_usd)
    .bind(&req.sheet)
    .fetch_one(executor)
    .await?;

    Ok(product)
}

/// Replaces the whole catalog with the confirmed upload.
///
/// Everything runs in one transaction: if any row fails to insert, the
/// transaction is rolled back and the previous catalog is left untouched.
/// After inserting, the stored rows are hashed against the upload; a mismatch
/// is logged but does not block the commit.
pub async fn replace_catalog(pool: &SqlitePool, rows: &[ParsedProductRow]) -> Result<Vec<Product>> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM products")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let mut saved = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for row in rows {
        match create_product(&mut *tx, &CreateProductRequest::from(row)).await {
            Ok(product) => saved.push(product),
            Err(e) => {
                tracing::warn!("Failed to insert product {}: {}", row.code, e);
                errors.push(format!("Error guardando producto \"{}\"", row.code));
            }
        }
    }

    if !errors.is_empty() {
        tx.rollback().await?;
        tracing::warn!(
            "Catalog replace rolled back: {} of {} rows failed",
            errors.len(),
            rows.len()
        );
        return Err(AppError::Conflict(errors.join("; ")));
    }

    let stored = find_all_ordered_by_code(&mut *tx).await?;
    let upload_hash = catalog_hash(rows.iter().map(CatalogEntry::from));
    let stored_hash = catalog_hash(stored.iter().map(CatalogEntry::from));

    if upload_hash == stored_hash {
        tracing::info!("Upload verification OK: upload hash matches stored catalog");
    } else {
        tracing::warn!(
            "Upload/catalog mismatch: upload count {}, stored count {}, upload hash {}, stored hash {}",
            rows.len(),
            stored.len(),
            upload_hash,
            stored_hash
        );
    }

    tx.commit().await?;

    tracing::info!(
        "Catalog replaced: {} products removed, {} inserted",
        deleted,
        saved.len()
    );

    Ok(saved)
}
