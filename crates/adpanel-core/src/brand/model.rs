//! Brand context model and cache key derivation.

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::policy::BRAND_KEY_SOURCE_CHARS;

fn default_market() -> String {
    "us".to_string()
}

/// The brand a test run evaluates creatives for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandContext {
    /// Free-text product description (required)
    pub product: String,
    /// Free-text description of the intended audience
    #[serde(default)]
    pub audience: String,
    /// Price point as entered (e.g. "$89/month")
    #[serde(default)]
    pub price: String,
    /// Market code (e.g. "us", "uk")
    #[serde(default = "default_market")]
    pub market: String,
}

impl BrandContext {
    pub fn new(
        product: impl Into<String>,
        audience: impl Into<String>,
        price: impl Into<String>,
        market: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            audience: audience.into(),
            price: price.into(),
            market: market.into(),
        }
    }

    /// Rejects a brand context without a product description.
    pub fn validate(&self) -> Result<()> {
        if self.product.trim().is_empty() {
            return Err(PanelError::validation("Product description is required."));
        }
        Ok(())
    }

    /// Cache key for this brand's persona panel.
    pub fn cache_key(&self) -> String {
        brand_key(&self.product)
    }

    /// Short human-readable brand name used in cache listings.
    pub fn display_name(&self) -> String {
        brand_display_name(&self.product)
    }
}

/// First [`BRAND_KEY_SOURCE_CHARS`] characters of the product description, trimmed.
pub fn brand_display_name(product: &str) -> String {
    product
        .trim()
        .chars()
        .take(BRAND_KEY_SOURCE_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Derives the panel cache key from a product description.
///
/// The display name is lowercased and every run of non-alphanumeric
/// characters collapses to a single `-`; leading and trailing separators
/// are dropped.
pub fn brand_key(product: &str) -> String {
    let mut key = String::new();
    let mut pending_separator = false;

    for ch in brand_display_name(product).chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('-');
            }
            pending_separator = false;
            key.push(ch);
        } else {
            pending_separator = true;
        }
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_key_normalizes() {
        assert_eq!(
            brand_key("Premium body composition supplement. Helps maintain muscle"),
            "premium-body-composition-supplement-hel"
        );
        assert_eq!(brand_key("  Acme -- Widgets!!  "), "acme-widgets");
        assert_eq!(brand_key("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn test_brand_key_truncates_source_before_normalizing() {
        let product = format!("{}{}", "a".repeat(40), "bbbb");
        assert_eq!(brand_key(&product), "a".repeat(40));
    }

    #[test]
    fn test_brand_key_is_stable() {
        let brand = BrandContext::new("Same Product", "", "", "us");
        assert_eq!(brand.cache_key(), brand.cache_key());
        assert_eq!(brand.cache_key(), "same-product");
    }

    #[test]
    fn test_validate_requires_product() {
        let brand = BrandContext::new("   ", "adults", "$10", "us");
        let err = brand.validate().unwrap_err();
        assert!(err.is_validation());
    }
}
