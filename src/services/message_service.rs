//! Plain-text quotes: one message for the client, one purchase order for the company.

use std::fmt::Write;

use chrono::{Datelike, Local, NaiveDate};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, Result},
    models::{ExchangeRateConfig, GeneratedMessages, MessageGenerationInput, PriceCalculation},
    queries::{config_queries, product_queries},
    services::{dollar_service::DollarService, price_calculator},
};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Prices every item against its stored product with a fresh official rate
/// and renders both messages.
pub async fn generate_messages(
    pool: &SqlitePool,
    dollars: &DollarService,
    input: &MessageGenerationInput,
) -> Result<GeneratedMessages> {
    let rates = ExchangeRateConfig {
        dollar_rate_official: dollars.official_rate_fresh().await,
        usd_30_days: config_queries::get_usd_30_days(pool).await?,
    };

    let ids: Vec<i64> = input.items.iter().map(|item| item.id).collect();
    let products = product_queries::find_by_ids(pool, &ids).await?;

    let calculations = input
        .items
        .iter()
        .map(|item| {
            let product = products.get(&item.id).ok_or_else(|| {
                AppError::NotFound(format!("Producto {} no encontrado", item.id))
            })?;
            Ok(price_calculator::calculate_price(
                product,
                input.payment_method,
                &rates,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GeneratedMessages {
        client_message: client_message(input, &calculations),
        company_message: company_message(input, &calculations, Local::now().date_naive()),
    })
}

pub fn client_message(input: &MessageGenerationInput, calculations: &[PriceCalculation]) -> String {
    let mut message = match input.client_name.as_deref() {
        Some(name) if !name.is_empty() => format!("Hola {},\n\n", name),
        _ => "Hola,\n\n".to_string(),
    };
    message.push_str("Te paso la cotización:\n\n");

    let mut total = 0.0;
    for (index, (item, calc)) in input.items.iter().zip(calculations).enumerate() {
        let subtotal = calc.price_ars * item.quantity as f64;
        total += subtotal;

        let _ = writeln!(message, "{}) {} x {}", index + 1, item.quantity, item.name);
        let _ = writeln!(message, "Unix: {}", item.code);
        let _ = writeln!(message, "Precio unitario: {}", money(calc.price_ars));
        let _ = writeln!(message, "Total: {}\n", money(subtotal));
    }

    let _ = write!(message, "Total general: {}\n\n", money(total));
    let _ = write!(message, "Condición de pago: {}", input.payment_method.label());

    message
}

pub fn company_message(
    input: &MessageGenerationInput,
    calculations: &[PriceCalculation],
    date: NaiveDate,
) -> String {
    let mut message = format!("{}\n\n", long_date(date));
    message.push_str("Orden de compra:\n\n");

    let mut total = 0.0;
    for (index, (item, calc)) in input.items.iter().zip(calculations).enumerate() {
        let quantity = item.quantity as f64;
        let subtotal_base = calc.price_base * quantity;
        let subtotal_iva = calc.iva_amount * quantity;
        let subtotal = calc.price_ars * quantity;
        total += subtotal;

        let _ = writeln!(message, "{}) {} x {}", index + 1, item.quantity, item.name);
        let _ = writeln!(message, "Unix: {}", item.code);
        let _ = writeln!(message, "Precio unitario: {} + IVA", money(calc.price_base));
        let _ = writeln!(
            message,
            "Total: {} + IVA ({}) = {}\n",
            money(subtotal_base),
            money(subtotal_iva),
            money(subtotal)
        );
    }

    let _ = write!(message, "Total general: {}\n\n", money(total));
    let _ = writeln!(message, "Forma de pago: {}", input.payment_method.label());

    if let Some(delivery) = input.delivery_info.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(message, "Lugar de entrega: {}", delivery);
    }

    message.push_str("\nAdjunto OC.");
    message
}

/// `18 de octubre de 2026`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageItem, PaymentMethod};
    use pretty_assertions::assert_eq;

    fn input(client_name: Option<&str>, delivery_info: Option<&str>) -> MessageGenerationInput {
        MessageGenerationInput {
            items: vec![
                MessageItem {
                    id: 1,
                    code: "U100".to_string(),
                    name: "Filtro dializador".to_string(),
                    quantity: 2,
                    price_usd: 100.0,
                    iva_included: false,
                },
                MessageItem {
                    id: 2,
                    code: "U200".to_string(),
                    name: "Línea arterial".to_string(),
                    quantity: 1,
                    price_usd: 12.1,
                    iva_included: true,
                },
            ],
            payment_method: PaymentMethod::Echeck,
            client_name: client_name.map(str::to_string),
            delivery_info: delivery_info.map(str::to_string),
        }
    }

    fn calculations() -> Vec<PriceCalculation> {
        vec![
            price_calculator::split_iva(100_000.0, false),
            price_calculator::split_iva(12_100.0, true),
        ]
    }

    #[test]
    fn client_message_lists_every_line() {
        let message = client_message(&input(Some("Clínica Norte"), None), &calculations());

        assert_eq!(
            message,
            "Hola Clínica Norte,\n\n\
             Te paso la cotización:\n\n\
             1) 2 x Filtro dializador\n\
             Unix: U100\n\
             Precio unitario: $121000.00\n\
             Total: $242000.00\n\n\
             2) 1 x Línea arterial\n\
             Unix: U200\n\
             Precio unitario: $12100.00\n\
             Total: $12100.00\n\n\
             Total general: $254100.00\n\n\
             Condición de pago: E-check"
        );
    }

    #[test]
    fn client_message_without_name_uses_plain_greeting() {
        let message = client_message(&input(None, None), &calculations());
        assert!(message.starts_with("Hola,\n\nTe paso la cotización:"));
    }

    #[test]
    fn company_message_breaks_out_iva() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let message = company_message(&input(None, Some("Av. Corrientes 1234")), &calculations(), date);

        assert_eq!(
            message,
            "18 de octubre de 2026\n\n\
             Orden de compra:\n\n\
             1) 2 x Filtro dializador\n\
             Unix: U100\n\
             Precio unitario: $100000.00 + IVA\n\
             Total: $200000.00 + IVA ($42000.00) = $242000.00\n\n\
             2) 1 x Línea arterial\n\
             Unix: U200\n\
             Precio unitario: $10000.00 + IVA\n\
             Total: $10000.00 + IVA ($2100.00) = $12100.00\n\n\
             Total general: $254100.00\n\n\
             Forma de pago: E-check\n\
             Lugar de entrega: Av. Corrientes 1234\n\
             \nAdjunto OC."
        );
    }

    #[test]
    fn company_message_omits_missing_delivery() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let message = company_message(&input(None, None), &calculations(), date);

        assert!(message.starts_with("5 de enero de 2026\n"));
        assert!(!message.contains("Lugar de entrega"));
        assert!(message.ends_with("Forma de pago: E-check\n\nAdjunto OC."));
    }

    #[test]
    fn long_date_uses_spanish_months() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(long_date(date), "31 de diciembre de 2025");
    }
}
