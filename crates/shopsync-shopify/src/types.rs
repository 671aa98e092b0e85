//! Shopify Admin REST API request and response types.
//!
//! ### Prices
//! The Admin API returns variant prices as decimal strings (`"12.99"`) and
//! `compare_at_price` as `null` when the variant is not on sale. Both are
//! modelled as `Option<Decimal>`; `rust_decimal` accepts the string form and
//! serializes back to a string, which is what the write endpoints expect.
//!
//! ### Collections
//! Custom and smart collections share `id`, `title`, and `handle` and are
//! deserialized into the same [`CollectionRecord`].

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A listing response whose items can be accumulated across pages.
pub trait Page: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Page for ProductsPage {
    type Item = Product;

    fn into_items(self) -> Vec<Product> {
        self.products
    }
}

/// A product as returned with `fields=id,title,body_html,variants`.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub id: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CustomCollectionsPage {
    #[serde(default)]
    pub custom_collections: Vec<CollectionRecord>,
}

impl Page for CustomCollectionsPage {
    type Item = CollectionRecord;

    fn into_items(self) -> Vec<CollectionRecord> {
        self.custom_collections
    }
}

#[derive(Debug, Deserialize)]
pub struct SmartCollectionsPage {
    #[serde(default)]
    pub smart_collections: Vec<CollectionRecord>,
}

impl Page for SmartCollectionsPage {
    type Item = CollectionRecord;

    fn into_items(self) -> Vec<CollectionRecord> {
        self.smart_collections
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
}

/// A storefront collection eligible as a menu target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub title: String,
    pub handle: String,
    pub product_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct CollectsPage {
    #[serde(default)]
    pub collects: Vec<Collect>,
}

impl Page for CollectsPage {
    type Item = Collect;

    fn into_items(self) -> Vec<Collect> {
        self.collects
    }
}

/// One product-to-collection membership.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Collect {
    pub product_id: i64,
    pub collection_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// Input for creating a single-variant product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub barcode: Option<String>,
    pub body_html: Option<String>,
}

/// Input for updating an existing product and its primary variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub product_id: i64,
    pub variant_id: Option<i64>,
    pub title: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub barcode: Option<String>,
    pub body_html: Option<String>,
}

/// Identifiers Shopify assigns to a newly created product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedProduct {
    pub product_id: i64,
    pub variant_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductEnvelope<T> {
    pub product: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductCreateBody<'a> {
    pub title: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<&'a str>,
    pub variants: [VariantCreateBody<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct VariantCreateBody<'a> {
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<&'a str>,
    pub inventory_management: &'static str,
    pub inventory_policy: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductUpdateBody<'a> {
    pub id: i64,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<&'a str>,
    /// Empty when the product has no known variant; sending `[]` would
    /// replace the variants.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantUpdateBody<'a>>,
}

/// `compare_at_price` is always sent so that `null` clears a finished promo.
#[derive(Debug, Serialize)]
pub(crate) struct VariantUpdateBody<'a> {
    pub id: i64,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomCollectionEnvelope<'a> {
    pub custom_collection: CustomCollectionBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomCollectionBody<'a> {
    pub title: &'a str,
    pub body_html: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomCollectionResponse {
    pub custom_collection: CollectionRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct CollectEnvelope {
    pub collect: CollectBody,
}

#[derive(Debug, Serialize)]
pub(crate) struct CollectBody {
    pub product_id: i64,
    pub collection_id: i64,
}

/// Result of adding a product to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    Added,
    AlreadyMember,
}
