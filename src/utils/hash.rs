use sha2::{Digest, Sha256};

use crate::models::{ParsedProductRow, Product};

/// The fields compared when checking a stored catalog against its upload.
#[derive(Debug, Clone)]
pub struct CatalogEntry<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub provider: Option<&'a str>,
    pub origin: Option<&'a str>,
    pub category: &'a str,
    pub price_usd: f64,
    pub price_alt_usd: Option<f64>,
    pub sheet: Option<&'a str>,
}

impl<'a> From<&'a ParsedProductRow> for CatalogEntry<'a> {
    fn from(row: &'a ParsedProductRow) -> Self {
        Self {
            code: &row.code,
            name: &row.name,
            provider: Some(&row.provider),
            origin: Some(&row.origin),
            category: &row.category,
            price_usd: row.price_usd,
            price_alt_usd: Some(row.price_alt_usd),
            sheet: Some(&row.sheet),
        }
    }
}

impl<'a> From<&'a Product> for CatalogEntry<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            code: &product.code,
            name: &product.name,
            provider: product.provider.as_deref(),
            origin: product.origin.as_deref(),
            category: &product.category,
            price_usd: product.price_usd,
            price_alt_usd: product.price_alt_usd,
            sheet: product.sheet.as_deref(),
        }
    }
}

impl CatalogEntry<'_> {
    fn line(&self) -> String {
        [
            self.code.to_string(),
            self.name.to_string(),
            self.provider.unwrap_or_default().to_string(),
            self.origin.unwrap_or_default().to_string(),
            self.category.to_string(),
            self.price_usd.to_string(),
            self.price_alt_usd.unwrap_or(0.0).to_string(),
            self.sheet.unwrap_or_default().to_string(),
        ]
        .join("|")
    }
}

/// SHA-256 over the entries sorted by code, hex encoded.
pub fn catalog_hash<'a>(entries: impl IntoIterator<Item = CatalogEntry<'a>>) -> String {
    let mut entries: Vec<CatalogEntry<'a>> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.code.cmp(b.code));

    let joined = entries
        .iter()
        .map(CatalogEntry::line)
        .collect::<Vec<_>>()
        .join("||");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}
