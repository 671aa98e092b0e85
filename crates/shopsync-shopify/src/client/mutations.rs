//! Write calls: collections, products, and collects.

use reqwest::Method;

use crate::error::ShopifyError;
use crate::types::{
    CollectBody, CollectEnvelope, CollectOutcome, CreatedProduct, CustomCollectionBody,
    CustomCollectionEnvelope, CustomCollectionResponse, CustomCollectionsPage, NewProduct,
    ProductCreateBody, ProductEnvelope, ProductResponse, ProductUpdate, ProductUpdateBody,
    VariantCreateBody, VariantUpdateBody,
};

use super::{parse_body, ShopifyClient};

const CREATED_VIA_API: &str = "<p>Created via API</p>";

impl ShopifyClient {
    /// Looks up a custom collection whose title equals `title`
    /// (case-insensitive, trimmed).
    ///
    /// # Errors
    ///
    /// Propagates request and parse errors.
    pub async fn find_collection_by_title(&self, title: &str) -> Result<Option<i64>, ShopifyError> {
        let url = self.endpoint("custom_collections.json", &[("title", title)])?;
        let page: CustomCollectionsPage = self.get_json(url.as_str()).await?;
        let wanted = title.trim();
        Ok(page
            .custom_collections
            .into_iter()
            .find(|c| c.title.trim().eq_ignore_ascii_case(wanted))
            .map(|c| c.id))
    }

    /// Creates a custom collection. `parent_collection_id` only annotates the
    /// body text; Shopify has no collection hierarchy.
    ///
    /// # Errors
    ///
    /// Propagates request and parse errors.
    pub async fn create_collection(
        &self,
        title: &str,
        parent_collection_id: Option<i64>,
    ) -> Result<i64, ShopifyError> {
        let mut body_html = CREATED_VIA_API.to_owned();
        if let Some(parent) = parent_collection_id {
            body_html.push_str(&format!("<p>Subcategory under {parent}</p>"));
        }
        let payload = CustomCollectionEnvelope {
            custom_collection: CustomCollectionBody { title, body_html },
        };

        let url = self.endpoint("custom_collections.json", &[])?;
        let raw = self.execute(Method::POST, url.as_str(), Some(&payload)).await?;
        let created: CustomCollectionResponse = parse_body(&raw.body, url.as_str())?;

        tracing::info!(collection_id = created.custom_collection.id, title, "collection created");
        Ok(created.custom_collection.id)
    }

    /// Creates an active, single-variant product with Shopify inventory
    /// tracking and the continue-selling policy.
    ///
    /// # Errors
    ///
    /// Propagates request and parse errors.
    pub async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError> {
        let payload = ProductEnvelope {
            product: ProductCreateBody {
                title: &product.title,
                status: "active",
                body_html: product.body_html.as_deref().filter(|s| !s.is_empty()),
                variants: [VariantCreateBody {
                    price: product.price,
                    compare_at_price: product.compare_at_price.filter(|c| *c > product.price),
                    barcode: product.barcode.as_deref().filter(|s| !s.is_empty()),
                    inventory_management: "shopify",
                    inventory_policy: "continue",
                }],
            },
        };

        let url = self.endpoint("products.json", &[])?;
        let raw = self.execute(Method::POST, url.as_str(), Some(&payload)).await?;
        let created: ProductResponse = parse_body(&raw.body, url.as_str())?;

        let result = CreatedProduct {
            product_id: created.product.id,
            variant_id: created.product.variants.first().map(|v| v.id),
        };
        tracing::info!(product_id = result.product_id, title = %product.title, "product created");
        Ok(result)
    }

    /// Updates title, description, and the primary variant's price, barcode,
    /// and compare-at price. A compare-at price not above the price is sent
    /// as `null`.
    ///
    /// # Errors
    ///
    /// Propagates request errors.
    pub async fn update_product(&self, update: &ProductUpdate) -> Result<(), ShopifyError> {
        let variants = update
            .variant_id
            .map(|id| VariantUpdateBody {
                id,
                price: update.price,
                compare_at_price: update.compare_at_price.filter(|c| *c > update.price),
                barcode: update.barcode.as_deref().filter(|s| !s.is_empty()),
            })
            .into_iter()
            .collect();
        let payload = ProductEnvelope {
            product: ProductUpdateBody {
                id: update.product_id,
                title: &update.title,
                body_html: update.body_html.as_deref().filter(|s| !s.is_empty()),
                variants,
            },
        };

        let url = self.endpoint(&format!("products/{}.json", update.product_id), &[])?;
        self.execute(Method::PUT, url.as_str(), Some(&payload)).await?;

        tracing::info!(product_id = update.product_id, title = %update.title, "product updated");
        Ok(())
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Propagates request errors.
    pub async fn delete_product(&self, product_id: i64) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!("products/{product_id}.json"), &[])?;
        self.execute::<()>(Method::DELETE, url.as_str(), None).await?;
        tracing::info!(product_id, "product deleted");
        Ok(())
    }

    /// Adds a product to a collection. A rejection saying the membership
    /// already exists is reported as [`CollectOutcome::AlreadyMember`].
    ///
    /// # Errors
    ///
    /// Propagates any other request error.
    pub async fn add_product_to_collection(
        &self,
        product_id: i64,
        collection_id: i64,
    ) -> Result<CollectOutcome, ShopifyError> {
        let payload = CollectEnvelope {
            collect: CollectBody {
                product_id,
                collection_id,
            },
        };
        let url = self.endpoint("collects.json", &[])?;

        match self.execute(Method::POST, url.as_str(), Some(&payload)).await {
            Ok(_) => Ok(CollectOutcome::Added),
            Err(err) if err.is_duplicate_collect() => {
                tracing::debug!(product_id, collection_id, "product already in collection");
                Ok(CollectOutcome::AlreadyMember)
            }
            Err(err) => Err(err),
        }
    }
}
