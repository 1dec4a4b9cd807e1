use sqlx::SqlitePool;

use crate::{
    error::Result,
    models::{CreateSaleRequest, Sale, TopClient, TopProduct},
};

const TOP_LIMIT: i64 = 10;

pub async fn create_sale(pool: &SqlitePool, req: &CreateSaleRequest) -> Result<Sale> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        INSERT INTO sales (
            client_id, product_id, units, price_usd_at_sale,
            dollar_rate_at_sale, price_final_ars, payment_condition
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(req.client_id)
    .bind(req.product_id)
    .bind(req.units)
    .bind(req.price_usd_at_sale)
    .bind(req.dollar_rate_at_sale)
    .bind(req.price_final_ars)
    .bind(&req.payment_condition)
    .fetch_one(pool)
    .await?;

    Ok(sale)
}

pub async fn find_by_client(pool: &SqlitePool, client_id: i64) -> Result<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(
        "SELECT * FROM sales WHERE client_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(sales)
}

/// Clients ranked by accumulated sales in local currency.
pub async fn top_clients(pool: &SqlitePool) -> Result<Vec<TopClient>> {
    let clients = sqlx::query_as::<_, TopClient>(
        r#"
        SELECT
            c.id, c.name, c.phone, c.rubro, c.company,
            SUM(s.price_final_ars) AS total_sales,
            COUNT(s.id) AS sales_count
        FROM clients c
        LEFT JOIN sales s ON s.client_id = c.id
        GROUP BY c.id
        HAVING COUNT(s.id) > 0
        ORDER BY total_sales DESC
        LIMIT ?
        "#,
    )
    .bind(TOP_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Products ranked by accumulated sales in local currency.
pub async fn top_products(pool: &SqlitePool) -> Result<Vec<TopProduct>> {
    let products = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT
            p.id, p.code, p.name, p.category,
            SUM(s.units) AS total_units,
            SUM(s.price_final_ars) AS total_sales,
            COUNT(s.id) AS sales_count
        FROM products p
        LEFT JOIN sales s ON s.product_id = p.id
        GROUP BY p.id
        HAVING COUNT(s.id) > 0
        ORDER BY total_sales DESC
        LIMIT ?
        "#,
    )
    .bind(TOP_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(products)
}
