//! Catalog cache builders: full product, collect, and collection listings.

use crate::cache::{CollectionMembership, ProductCache};
use crate::error::ShopifyError;
use crate::types::{
    Collection, CollectionRecord, CollectsPage, CountResponse, CustomCollectionsPage,
    ProductsPage, SmartCollectionsPage,
};

use super::{ShopifyClient, PAGE_LIMIT};

impl ShopifyClient {
    /// Lists every product and indexes it by barcode and normalized title.
    ///
    /// # Errors
    ///
    /// Propagates any listing error; a partial cache is never returned.
    pub async fn build_product_cache(&self) -> Result<ProductCache, ShopifyError> {
        let limit = PAGE_LIMIT.to_string();
        let url = self.endpoint(
            "products.json",
            &[
                ("limit", &limit),
                ("fields", "id,title,body_html,variants"),
            ],
        )?;
        let products = self.fetch_all::<ProductsPage>(url).await?;
        let cache = ProductCache::from_products(&products);

        tracing::info!(
            products = cache.len(),
            by_barcode = cache.by_barcode.len(),
            by_title = cache.by_title.len(),
            "storefront product cache built"
        );
        Ok(cache)
    }

    /// Lists every collect as a `(product_id, collection_id)` set.
    ///
    /// # Errors
    ///
    /// Propagates any listing error.
    pub async fn build_collection_membership(&self) -> Result<CollectionMembership, ShopifyError> {
        let limit = PAGE_LIMIT.to_string();
        let url = self.endpoint("collects.json", &[("limit", &limit)])?;
        let membership: CollectionMembership = self
            .fetch_all::<CollectsPage>(url)
            .await?
            .into_iter()
            .map(|c| (c.product_id, c.collection_id))
            .collect();

        tracing::info!(count = membership.len(), "storefront collection membership fetched");
        Ok(membership)
    }

    /// Lists custom and smart collections and keeps those with at least one
    /// product. Custom collections come first, each in listing order.
    ///
    /// # Errors
    ///
    /// Propagates listing errors and connectivity failures while counting.
    pub async fn fetch_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        let limit = PAGE_LIMIT.to_string();
        let custom_url = self.endpoint("custom_collections.json", &[("limit", &limit)])?;
        let smart_url = self.endpoint("smart_collections.json", &[("limit", &limit)])?;

        let mut records = self.fetch_all::<CustomCollectionsPage>(custom_url).await?;
        records.extend(self.fetch_all::<SmartCollectionsPage>(smart_url).await?);
        let listed = records.len();

        let mut collections = Vec::with_capacity(listed);
        for CollectionRecord { id, title, handle } in records {
            let product_count = self.collection_product_count(id).await?;
            if product_count > 0 {
                collections.push(Collection {
                    id,
                    title,
                    handle,
                    product_count,
                });
            }
        }

        tracing::info!(
            listed,
            with_products = collections.len(),
            "storefront collections fetched"
        );
        Ok(collections)
    }

    /// Counts products in a collection via `collects/count.json`, falling
    /// back to `products/count.json` (which also covers smart collections).
    /// When both endpoints answer with an error the count is 0.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Unreachable`] and other transport failures;
    /// HTTP error statuses are absorbed by the fallback.
    pub async fn collection_product_count(&self, collection_id: i64) -> Result<u64, ShopifyError> {
        let id = collection_id.to_string();
        let collects_url = self.endpoint("collects/count.json", &[("collection_id", &id)])?;

        match self.get_json::<CountResponse>(collects_url.as_str()).await {
            Ok(count) => return Ok(count.count),
            Err(err) if is_fatal_for_count(&err) => return Err(err),
            Err(err) => {
                tracing::debug!(collection_id, error = %err, "collect count failed, trying product count");
            }
        }

        let products_url = self.endpoint("products/count.json", &[("collection_id", &id)])?;
        match self.get_json::<CountResponse>(products_url.as_str()).await {
            Ok(count) => Ok(count.count),
            Err(err) if is_fatal_for_count(&err) => Err(err),
            Err(err) => {
                tracing::warn!(collection_id, error = %err, "product count unavailable, treating as empty");
                Ok(0)
            }
        }
    }
}

fn is_fatal_for_count(err: &ShopifyError) -> bool {
    matches!(
        err,
        ShopifyError::Unreachable { .. } | ShopifyError::Http(_) | ShopifyError::RateLimited { .. }
    )
}
