use crate::models::{
    CartLinePrice, ExchangeRateConfig, PaymentMethod, PriceCalculation, Product,
};

pub const IVA_RATE: f64 = 0.21;

/// A cart line whose product has already been resolved.
#[derive(Debug, Clone)]
pub struct PricedLine<'a> {
    pub product: &'a Product,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
}

/// 30-day terms use the deferred rate; cash and e-check use the official one.
pub fn select_rate(payment_method: PaymentMethod, rates: &ExchangeRateConfig) -> f64 {
    match payment_method {
        PaymentMethod::ThirtyDays => rates.usd_30_days,
        PaymentMethod::Contado | PaymentMethod::Echeck => rates.dollar_rate_official,
    }
}

pub fn calculate_price(
    product: &Product,
    payment_method: PaymentMethod,
    rates: &ExchangeRateConfig,
) -> PriceCalculation {
    let nominal = product.price_usd * select_rate(payment_method, rates);
    split_iva(nominal, product.iva_included)
}

/// Splits a local-currency amount into base and IVA.
pub fn split_iva(nominal: f64, iva_included: bool) -> PriceCalculation {
    if iva_included {
        let price_base = nominal / (1.0 + IVA_RATE);
        PriceCalculation {
            price_base,
            iva_amount: nominal - price_base,
            price_ars: nominal,
        }
    } else {
        let iva_amount = nominal * IVA_RATE;
        PriceCalculation {
            price_base: nominal,
            iva_amount,
            price_ars: nominal + iva_amount,
        }
    }
}

/// Prices every cart line, keeping input order.
pub fn calculate_cart(lines: &[PricedLine<'_>], rates: &ExchangeRateConfig) -> Vec<CartLinePrice> {
    lines
        .iter()
        .map(|line| {
            let calculation = calculate_price(line.product, line.payment_method, rates);
            CartLinePrice {
                id: line.product.id,
                quantity: line.quantity,
                price_base: calculation.price_base,
                iva_amount: calculation.iva_amount,
                price_ars: calculation.price_ars,
                total_ars: calculation.price_ars * line.quantity as f64,
                payment_method: line.payment_method,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    const EPSILON: f64 = 1e-6;

    fn product(id: i64, price_usd: f64, iva_included: bool) -> Product {
        Product {
            id,
            code: format!("P{:03}", id),
            name: format!("Producto {}", id),
            category: "Renal".to_string(),
            price_usd,
            iva_included,
            description: None,
            provider: None,
            origin: None,
            price_alt_usd: None,
            sheet: None,
            updated_at: NaiveDateTime::default(),
        }
    }

    fn rates() -> ExchangeRateConfig {
        ExchangeRateConfig {
            dollar_rate_official: 1000.0,
            usd_30_days: 1100.0,
        }
    }

    #[test]
    fn tax_exclusive_price_adds_iva() {
        let result = calculate_price(&product(1, 100.0, false), PaymentMethod::Contado, &rates());

        assert!((result.price_base - 100_000.0).abs() < EPSILON);
        assert!((result.iva_amount - 21_000.0).abs() < EPSILON);
        assert!((result.price_ars - 121_000.0).abs() < EPSILON);
    }

    #[test]
    fn tax_inclusive_price_extracts_iva() {
        let result = calculate_price(&product(1, 100.0, true), PaymentMethod::Contado, &rates());

        assert_eq!(result.price_ars, 100_000.0);
        assert!((result.price_base - 100_000.0 / 1.21).abs() < EPSILON);
        assert!((result.price_base - 82_644.63).abs() < 0.01);
        assert!((result.iva_amount - 17_355.37).abs() < 0.01);
        assert!((result.price_base + result.iva_amount - 100_000.0).abs() < EPSILON);
    }

    #[test]
    fn thirty_day_terms_use_deferred_rate() {
        let result = calculate_price(
            &product(1, 10.0, false),
            PaymentMethod::ThirtyDays,
            &rates(),
        );
        assert!((result.price_base - 11_000.0).abs() < EPSILON);
    }

    #[test]
    fn echeck_uses_official_rate() {
        assert_eq!(select_rate(PaymentMethod::Echeck, &rates()), 1000.0);
        assert_eq!(select_rate(PaymentMethod::Contado, &rates()), 1000.0);
        assert_eq!(select_rate(PaymentMethod::ThirtyDays, &rates()), 1100.0);
    }

    #[test]
    fn calculation_is_deterministic() {
        let item = product(1, 37.3, true);
        let first = calculate_price(&item, PaymentMethod::Echeck, &rates());
        let second = calculate_price(&item, PaymentMethod::Echeck, &rates());

        assert_eq!(first.price_base.to_bits(), second.price_base.to_bits());
        assert_eq!(first.iva_amount.to_bits(), second.iva_amount.to_bits());
        assert_eq!(first.price_ars.to_bits(), second.price_ars.to_bits());
    }

    #[test]
    fn cart_keeps_order_and_multiplies_totals() {
        let a = product(7, 10.0, false);
        let b = product(3, 100.0, true);
        let lines = vec![
            PricedLine {
                product: &a,
                quantity: 3,
                payment_method: PaymentMethod::Contado,
            },
            PricedLine {
                product: &b,
                quantity: 2,
                payment_method: PaymentMethod::ThirtyDays,
            },
        ];

        let priced = calculate_cart(&lines, &rates());

        assert_eq!(priced.iter().map(|l| l.id).collect::<Vec<_>>(), vec![7, 3]);
        assert!((priced[0].total_ars - 12_100.0 * 3.0).abs() < EPSILON);
        assert!((priced[1].price_ars - 110_000.0).abs() < EPSILON);
        assert!((priced[1].total_ars - 220_000.0).abs() < EPSILON);
        assert_eq!(priced[1].payment_method, PaymentMethod::ThirtyDays);
    }
}
