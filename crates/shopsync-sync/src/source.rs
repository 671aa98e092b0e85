//! Seams between the reconciliation engine and the two remote systems.

use async_trait::async_trait;
use shopsync_pos::{PosClient, PosError, PosFeed};
use shopsync_shopify::{
    CollectOutcome, CollectionMembership, CreatedProduct, NewProduct, ProductCache, ProductUpdate,
    ShopifyClient, ShopifyError,
};

/// Source of the POS catalog feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self) -> Result<PosFeed, PosError>;
}

#[async_trait]
impl FeedSource for PosClient {
    async fn fetch_feed(&self) -> Result<PosFeed, PosError> {
        PosClient::fetch_feed(self).await
    }
}

/// The storefront operations a sync run reads and writes.
#[async_trait]
pub trait Storefront: Send + Sync {
    async fn build_product_cache(&self) -> Result<ProductCache, ShopifyError>;

    async fn build_collection_membership(&self) -> Result<CollectionMembership, ShopifyError>;

    async fn find_collection_by_title(&self, title: &str) -> Result<Option<i64>, ShopifyError>;

    async fn create_collection(
        &self,
        title: &str,
        parent_collection_id: Option<i64>,
    ) -> Result<i64, ShopifyError>;

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError>;

    async fn update_product(&self, update: &ProductUpdate) -> Result<(), ShopifyError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), ShopifyError>;

    async fn add_product_to_collection(
        &self,
        product_id: i64,
        collection_id: i64,
    ) -> Result<CollectOutcome, ShopifyError>;
}

#[async_trait]
impl Storefront for ShopifyClient {
    async fn build_product_cache(&self) -> Result<ProductCache, ShopifyError> {
        ShopifyClient::build_product_cache(self).await
    }

    async fn build_collection_membership(&self) -> Result<CollectionMembership, ShopifyError> {
        ShopifyClient::build_collection_membership(self).await
    }

    async fn find_collection_by_title(&self, title: &str) -> Result<Option<i64>, ShopifyError> {
        ShopifyClient::find_collection_by_title(self, title).await
    }

    async fn create_collection(
        &self,
        title: &str,
        parent_collection_id: Option<i64>,
    ) -> Result<i64, ShopifyError> {
        ShopifyClient::create_collection(self, title, parent_collection_id).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError> {
        ShopifyClient::create_product(self, product).await
    }

    async fn update_product(&self, update: &ProductUpdate) -> Result<(), ShopifyError> {
        ShopifyClient::update_product(self, update).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), ShopifyError> {
        ShopifyClient::delete_product(self, product_id).await
    }

    async fn add_product_to_collection(
        &self,
        product_id: i64,
        collection_id: i64,
    ) -> Result<CollectOutcome, ShopifyError> {
        ShopifyClient::add_product_to_collection(self, product_id, collection_id).await
    }
}
