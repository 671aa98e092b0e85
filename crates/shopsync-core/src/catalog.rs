//! POS catalog records in their canonical, ingestion-normalized form.
//!
//! The POS feed arrives in several JSON shapes with loosely typed ids; the
//! `shopsync-pos` adapter converts every record into these types before any
//! diffing or menu logic sees it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical POS identifier.
///
/// The POS returns ids as strings in some endpoints and as numbers in others.
/// Every id is stored as its trimmed string rendering so that comparisons
/// are plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosId(String);

impl PosId {
    /// Builds an id from a raw string, returning `None` when it is blank.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used for GUID-style group ids.
    #[must_use]
    pub fn matches_ignore_case(&self, other: &PosId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::fmt::Display for PosId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level POS department (`DepID`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: PosId,
    pub title: String,
    /// Category group the department belongs to (`GrpID`).
    pub group_id: Option<PosId>,
}

/// A POS sub-department (`SubID`) nested under a [`Department`].
///
/// `id` is absent on some feeds. Such entries still name a menu leaf but
/// cannot be mapped to a storefront collection during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDepartment {
    pub id: Option<PosId>,
    pub department_id: PosId,
    pub title: String,
}

/// One sellable POS item as listed by the web product feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosProduct {
    pub title: String,
    /// Trimmed, non-empty barcode when the POS has one.
    pub barcode: Option<String>,
    /// Web description (`WebDesc`), passed to the storefront as `body_html`.
    pub description: Option<String>,
    pub department_id: Option<PosId>,
    pub sub_department_id: Option<PosId>,
    pub store_promo_price: Option<Decimal>,
    pub store_unit_price: Option<Decimal>,
    pub web_unit_price: Option<Decimal>,
}

/// Selling price and optional strike-through price for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub price: Decimal,
    /// Present only when strictly greater than `price`.
    pub compare_at_price: Option<Decimal>,
}

impl PosProduct {
    /// Derives the storefront price pair from the POS price columns.
    ///
    /// A positive promo price becomes the selling price and the regular store
    /// price (or web price) becomes the compare-at price. Without a promo the
    /// store price, then the web price, is the single price.
    #[must_use]
    pub fn resolved_price(&self) -> ResolvedPrice {
        let regular = self.store_unit_price.or(self.web_unit_price);
        let promo = self.store_promo_price.filter(|p| *p > Decimal::ZERO);

        match promo {
            Some(promo) => ResolvedPrice {
                price: promo,
                compare_at_price: regular.filter(|c| *c > promo),
            },
            None => ResolvedPrice {
                price: regular.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
                compare_at_price: None,
            },
        }
    }

    /// Lowercase, trimmed title used as the secondary identity key.
    #[must_use]
    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }
}

/// Normalizes a product or collection title into a lookup key.
#[must_use]
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(promo: Option<Decimal>, store: Option<Decimal>, web: Option<Decimal>) -> PosProduct {
        PosProduct {
            title: "Dog Biscuits 1kg".to_string(),
            barcode: None,
            description: None,
            department_id: None,
            sub_department_id: None,
            store_promo_price: promo,
            store_unit_price: store,
            web_unit_price: web,
        }
    }

    #[test]
    fn promo_price_becomes_price_with_store_price_as_compare_at() {
        let resolved =
            product(Some(Decimal::new(999, 2)), Some(Decimal::new(1499, 2)), None).resolved_price();
        assert_eq!(resolved.price, Decimal::new(999, 2));
        assert_eq!(resolved.compare_at_price, Some(Decimal::new(1499, 2)));
    }

    #[test]
    fn zero_promo_uses_store_price_without_compare_at() {
        let resolved =
            product(Some(Decimal::ZERO), Some(Decimal::new(1200, 2)), None).resolved_price();
        assert_eq!(resolved.price, Decimal::new(1200, 2));
        assert_eq!(resolved.compare_at_price, None);
    }

    #[test]
    fn web_price_is_fallback_when_store_prices_absent() {
        let resolved = product(None, None, Some(Decimal::new(500, 2))).resolved_price();
        assert_eq!(resolved.price, Decimal::new(500, 2));
        assert_eq!(resolved.compare_at_price, None);
    }

    #[test]
    fn promo_falls_back_to_web_price_for_compare_at() {
        let resolved =
            product(Some(Decimal::new(400, 2)), None, Some(Decimal::new(500, 2))).resolved_price();
        assert_eq!(resolved.price, Decimal::new(400, 2));
        assert_eq!(resolved.compare_at_price, Some(Decimal::new(500, 2)));
    }

    #[test]
    fn compare_at_dropped_when_not_greater_than_promo() {
        let resolved =
            product(Some(Decimal::new(800, 2)), Some(Decimal::new(800, 2)), None).resolved_price();
        assert_eq!(resolved.price, Decimal::new(800, 2));
        assert_eq!(resolved.compare_at_price, None);
    }

    #[test]
    fn missing_prices_resolve_to_zero() {
        let resolved = product(None, None, None).resolved_price();
        assert_eq!(resolved.price, Decimal::ZERO);
        assert_eq!(resolved.compare_at_price, None);
    }

    #[test]
    fn negative_price_is_clamped() {
        let resolved = product(None, Some(Decimal::new(-100, 2)), None).resolved_price();
        assert_eq!(resolved.price, Decimal::ZERO);
    }

    #[test]
    fn title_key_lowercases_and_trims() {
        assert_eq!(title_key("  Dog FOOD "), "dog food");
    }

    #[test]
    fn pos_id_rejects_blank_and_trims() {
        assert!(PosId::new("   ").is_none());
        assert_eq!(PosId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn pos_id_case_insensitive_match() {
        let a = PosId::new("4E9F4017-D7D6").unwrap();
        let b = PosId::new("4e9f4017-d7d6").unwrap();
        assert!(a.matches_ignore_case(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn pos_id_serializes_as_plain_string() {
        let id = PosId::new("17").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
    }
}
