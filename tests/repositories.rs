mod common;

use common::{parsed_row, test_pool};
use cotizador_back::{
    models::{CreateClientRequest, CreateSaleRequest, UpdateClientRequest},
    queries::{client_queries, config_queries, product_queries, sale_queries},
};
use pretty_assertions::assert_eq;

fn client(name: &str, phone: &str) -> CreateClientRequest {
    CreateClientRequest {
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        rubro: Some("Hospital".to_string()),
        company: None,
        notes: None,
    }
}

fn sale(client_id: i64, product_id: i64, units: i64, total: f64) -> CreateSaleRequest {
    CreateSaleRequest {
        client_id,
        product_id,
        units,
        price_usd_at_sale: 10.0,
        dollar_rate_at_sale: 1000.0,
        price_final_ars: total,
        payment_condition: "contado".to_string(),
    }
}

#[tokio::test]
async fn client_crud() {
    let pool = test_pool().await;

    let created = client_queries::create_client(&pool, &client("Clínica Sur", "+5491122334455"))
        .await
        .unwrap();
    assert_eq!(created.name, "Clínica Sur");

    let updated = client_queries::update_client(
        &pool,
        created.id,
        &UpdateClientRequest {
            notes: Some("Llamar los lunes".to_string()),
            ..UpdateClientRequest::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Clínica Sur");
    assert_eq!(updated.notes.as_deref(), Some("Llamar los lunes"));
    assert_eq!(updated.rubro.as_deref(), Some("Hospital"));

    let by_phone = client_queries::find_by_phone(&pool, "+5491122334455")
        .await
        .unwrap();
    assert_eq!(by_phone.map(|c| c.id), Some(created.id));

    assert!(client_queries::delete_client(&pool, created.id).await.unwrap());
    assert!(!client_queries::delete_client(&pool, created.id).await.unwrap());
    assert!(client_queries::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn update_of_missing_client_returns_none() {
    let pool = test_pool().await;

    let result = client_queries::update_client(&pool, 99, &UpdateClientRequest::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn batch_import_skips_known_phones() {
    let pool = test_pool().await;
    client_queries::create_client(&pool, &client("Existente", "+5491100000001"))
        .await
        .unwrap();

    let imported = client_queries::create_batch(
        &pool,
        &[
            client("Existente otra vez", "+5491100000001"),
            client("Nuevo", "+5491100000002"),
            client("Nuevo repetido", "+5491100000002"),
            client("Otro", "+5491100000003"),
        ],
    )
    .await
    .unwrap();

    assert_eq!(imported, 2);
    assert_eq!(client_queries::find_all(&pool).await.unwrap().len(), 3);
}

#[tokio::test]
async fn config_rate_defaults_and_updates() {
    let pool = test_pool().await;

    assert_eq!(config_queries::get_usd_30_days(&pool).await.unwrap(), 1000.0);
    assert_eq!(
        config_queries::update_usd_30_days(&pool, 1150.5).await.unwrap(),
        1150.5
    );
    assert_eq!(config_queries::get_usd_30_days(&pool).await.unwrap(), 1150.5);
}

#[tokio::test]
async fn missing_ids_are_absent_from_batch_lookup() {
    let pool = test_pool().await;
    let saved = product_queries::replace_catalog(&pool, &[parsed_row("A1", "Filtro", 10.0)])
        .await
        .unwrap();

    let found = product_queries::find_by_ids(&pool, &[saved[0].id, 4242])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert!(found.contains_key(&saved[0].id));
}

#[tokio::test]
async fn sales_analytics_rank_by_total() {
    let pool = test_pool().await;
    let products = product_queries::replace_catalog(
        &pool,
        &[parsed_row("A1", "Filtro", 10.0), parsed_row("B2", "Línea", 2.0)],
    )
    .await
    .unwrap();
    let small = client_queries::create_client(&pool, &client("Chico", "+5491100000010"))
        .await
        .unwrap();
    let big = client_queries::create_client(&pool, &client("Grande", "+5491100000020"))
        .await
        .unwrap();
    client_queries::create_client(&pool, &client("Sin compras", "+5491100000030"))
        .await
        .unwrap();

    sale_queries::create_sale(&pool, &sale(small.id, products[1].id, 1, 2_000.0))
        .await
        .unwrap();
    sale_queries::create_sale(&pool, &sale(big.id, products[0].id, 3, 30_000.0))
        .await
        .unwrap();
    sale_queries::create_sale(&pool, &sale(big.id, products[1].id, 5, 10_000.0))
        .await
        .unwrap();

    let top_clients = sale_queries::top_clients(&pool).await.unwrap();
    assert_eq!(
        top_clients.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Grande", "Chico"]
    );
    assert_eq!(top_clients[0].total_sales, Some(40_000.0));
    assert_eq!(top_clients[0].sales_count, 2);

    let top_products = sale_queries::top_products(&pool).await.unwrap();
    assert_eq!(top_products[0].code, "A1");
    assert_eq!(top_products[1].total_units, Some(6));

    let big_sales = sale_queries::find_by_client(&pool, big.id).await.unwrap();
    assert_eq!(big_sales.len(), 2);
}
