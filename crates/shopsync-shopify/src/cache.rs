//! Run-scoped indexes over the storefront catalog.
//!
//! A [`ProductCache`] is built once per reconciliation run from the full
//! product listing and then mutated in place as products are created, so
//! later feed entries in the same run match against earlier creations.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use shopsync_core::title_key;

use crate::types::Product;

/// Set of `(product_id, collection_id)` memberships known to exist.
pub type CollectionMembership = HashSet<(i64, i64)>;

/// The remote state of a product that decides whether it needs an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub title: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub body_html: Option<String>,
    /// Primary (first) variant, the one price updates target.
    pub variant_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductCache {
    /// Trimmed, non-empty variant barcode → product id.
    pub by_barcode: HashMap<String, i64>,
    /// Lowercase, trimmed title → product id.
    pub by_title: HashMap<String, i64>,
    pub snapshots: HashMap<i64, ProductSnapshot>,
}

impl ProductCache {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut cache = Self::default();
        for product in products {
            cache.insert_product(product);
        }
        cache
    }

    /// Indexes one listed product. Later products overwrite earlier ones on
    /// the same key, and every variant with a barcode contributes.
    pub fn insert_product(&mut self, product: &Product) {
        let key = title_key(&product.title);
        if !key.is_empty() {
            self.by_title.insert(key, product.id);
        }

        for variant in &product.variants {
            if let Some(barcode) = variant
                .barcode
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
            {
                self.by_barcode.insert(barcode.to_owned(), product.id);
            }
        }

        let primary = product.variants.first();
        self.snapshots.insert(
            product.id,
            ProductSnapshot {
                title: product.title.clone(),
                price: primary.and_then(|v| v.price).unwrap_or(Decimal::ZERO),
                compare_at_price: primary.and_then(|v| v.compare_at_price),
                body_html: product.body_html.clone(),
                variant_id: primary.map(|v| v.id),
            },
        );
    }

    /// Resolves a feed item to a storefront product id, barcode first.
    #[must_use]
    pub fn find(&self, barcode: Option<&str>, title_key: &str) -> Option<i64> {
        barcode
            .and_then(|b| self.by_barcode.get(b))
            .or_else(|| self.by_title.get(title_key))
            .copied()
    }

    /// Registers a product created during the current run under both keys.
    pub fn record_created(
        &mut self,
        product_id: i64,
        barcode: Option<&str>,
        title_key: &str,
        snapshot: ProductSnapshot,
    ) {
        if let Some(barcode) = barcode.filter(|b| !b.is_empty()) {
            self.by_barcode.insert(barcode.to_owned(), product_id);
        }
        if !title_key.is_empty() {
            self.by_title.insert(title_key.to_owned(), product_id);
        }
        self.snapshots.insert(product_id, snapshot);
    }

    #[must_use]
    pub fn snapshot(&self, product_id: i64) -> Option<&ProductSnapshot> {
        self.snapshots.get(&product_id)
    }

    /// Number of distinct products indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
