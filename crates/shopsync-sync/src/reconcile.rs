//! The diffing engine: POS feed + catalog cache → storefront mutations.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rust_decimal::Decimal;
use shopsync_core::{
    title_key, AppConfig, Department, PosId, PosProduct, ResolvedPrice, SubDepartment,
};
use shopsync_shopify::{
    CollectOutcome, CollectionMembership, NewProduct, ProductCache, ProductSnapshot,
    ProductUpdate,
};

use crate::report::{EntityCounters, SyncReport};
use crate::source::Storefront;

/// Prices closer than this are considered equal.
const PRICE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Pacing for remote calls while walking the product feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Pause after every `throttle_every` products; `0` disables pacing.
    pub throttle_every: usize,
    pub throttle_pause: Duration,
}

impl SyncOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            throttle_every: config.sync_throttle_every,
            throttle_pause: Duration::from_millis(config.sync_throttle_pause_ms),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            throttle_every: 20,
            throttle_pause: Duration::from_millis(50),
        }
    }
}

/// Run-scoped storefront state, built fresh for each run and mutated in place.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    pub products: ProductCache,
    pub membership: CollectionMembership,
}

/// Keys and ids observed while walking the feed, used by the orphan pass.
#[derive(Debug, Default)]
struct FeedTrace {
    barcodes: HashSet<String>,
    titles: HashSet<String>,
    /// Storefront ids matched or created in this run; never deleted.
    touched: HashSet<i64>,
}

/// Applies the POS feed to the storefront and returns per-kind counters.
///
/// Departments and sub-departments are mapped to collections first, then
/// each product is created or updated and added to its collections, and
/// finally storefront products absent from the feed are deleted. Mutation
/// failures are logged, counted as `failed`, and do not stop the run.
pub async fn reconcile<S>(
    storefront: &S,
    departments: &[Department],
    sub_departments: &[SubDepartment],
    products: &[PosProduct],
    cache: &mut CatalogCache,
    options: &SyncOptions,
) -> SyncReport
where
    S: Storefront + ?Sized,
{
    let mut report = SyncReport::default();

    let mut department_collections: HashMap<PosId, i64> = HashMap::new();
    for department in departments {
        if let Some(collection_id) =
            map_collection(storefront, &department.title, None, &mut report.departments).await
        {
            department_collections.insert(department.id.clone(), collection_id);
        }
    }

    let mut sub_collections: HashMap<PosId, i64> = HashMap::new();
    for sub in sub_departments {
        let Some(sub_id) = &sub.id else {
            tracing::debug!(title = %sub.title, "sub-department without id; not synced");
            continue;
        };
        let parent = department_collections.get(&sub.department_id).copied();
        if let Some(collection_id) =
            map_collection(storefront, &sub.title, parent, &mut report.sub_departments).await
        {
            sub_collections.insert(sub_id.clone(), collection_id);
        }
    }

    let mut trace = FeedTrace::default();
    for (index, product) in products.iter().enumerate() {
        let collections = [
            product
                .department_id
                .as_ref()
                .and_then(|id| department_collections.get(id))
                .copied(),
            product
                .sub_department_id
                .as_ref()
                .and_then(|id| sub_collections.get(id))
                .copied(),
        ];
        sync_product(
            storefront,
            product,
            &collections,
            cache,
            &mut trace,
            &mut report.products,
        )
        .await;

        if options.throttle_every > 0 && index % options.throttle_every == 0 {
            tokio::time::sleep(options.throttle_pause).await;
        }
    }

    delete_orphans(storefront, &cache.products, &trace, &mut report.products).await;

    tracing::info!(
        departments_created = report.departments.created,
        departments_existing = report.departments.existing,
        sub_departments_created = report.sub_departments.created,
        sub_departments_existing = report.sub_departments.existing,
        products_created = report.products.created,
        products_updated = report.products.updated,
        products_skipped = report.products.skipped,
        products_deleted = report.products.deleted,
        failures = report.failures(),
        "reconciliation finished"
    );
    report
}

/// Looks up a collection by exact title, creating it when absent.
async fn map_collection<S>(
    storefront: &S,
    title: &str,
    parent_collection_id: Option<i64>,
    counters: &mut EntityCounters,
) -> Option<i64>
where
    S: Storefront + ?Sized,
{
    let outcome = match storefront.find_collection_by_title(title).await {
        Ok(Some(id)) => Ok((id, false)),
        Ok(None) => storefront
            .create_collection(title, parent_collection_id)
            .await
            .map(|id| (id, true)),
        Err(err) => Err(err),
    };

    match outcome {
        Ok((id, true)) => {
            counters.created += 1;
            tracing::debug!(title, collection_id = id, "collection mapped after creation");
            Some(id)
        }
        Ok((id, false)) => {
            counters.existing += 1;
            tracing::debug!(title, collection_id = id, "collection already exists");
            Some(id)
        }
        Err(err) => {
            counters.failed += 1;
            tracing::warn!(title, error = %err, "failed to map collection");
            None
        }
    }
}

async fn sync_product<S>(
    storefront: &S,
    product: &PosProduct,
    collections: &[Option<i64>],
    cache: &mut CatalogCache,
    trace: &mut FeedTrace,
    counters: &mut EntityCounters,
) where
    S: Storefront + ?Sized,
{
    let key = product.title_key();
    let barcode = product.barcode.as_deref();
    if let Some(barcode) = barcode {
        trace.barcodes.insert(barcode.to_owned());
    }
    trace.titles.insert(key.clone());

    let price = product.resolved_price();
    let product_id = match cache.products.find(barcode, &key) {
        Some(existing_id) => {
            trace.touched.insert(existing_id);
            update_if_changed(storefront, existing_id, product, price, cache, counters).await;
            existing_id
        }
        None => match create(storefront, product, price, &key, cache, counters).await {
            Some(created_id) => {
                trace.touched.insert(created_id);
                created_id
            }
            None => return,
        },
    };

    let mut mapped = false;
    for collection_id in collections.iter().flatten().copied() {
        mapped |= add_to_collection(storefront, product_id, collection_id, cache, counters).await;
    }
    if !mapped {
        tracing::warn!(product_id, title = %product.title, "product not mapped to any collection");
    }
}

async fn update_if_changed<S>(
    storefront: &S,
    product_id: i64,
    product: &PosProduct,
    price: ResolvedPrice,
    cache: &mut CatalogCache,
    counters: &mut EntityCounters,
) where
    S: Storefront + ?Sized,
{
    let Some(snapshot) = cache.products.snapshot(product_id) else {
        counters.skipped += 1;
        return;
    };
    if !needs_update(snapshot, product, price) {
        counters.skipped += 1;
        return;
    }

    let update = ProductUpdate {
        product_id,
        variant_id: snapshot.variant_id,
        title: product.title.clone(),
        price: price.price,
        compare_at_price: price.compare_at_price,
        barcode: product.barcode.clone(),
        body_html: product.description.clone(),
    };
    match storefront.update_product(&update).await {
        Ok(()) => {
            counters.updated += 1;
            let refreshed = ProductSnapshot {
                title: product.title.clone(),
                price: price.price,
                compare_at_price: price.compare_at_price,
                body_html: product
                    .description
                    .clone()
                    .filter(|d| !d.is_empty())
                    .or_else(|| snapshot.body_html.clone()),
                variant_id: snapshot.variant_id,
            };
            cache.products.snapshots.insert(product_id, refreshed);
            tracing::debug!(product_id, "cached snapshot refreshed after update");
        }
        Err(err) => {
            counters.failed += 1;
            tracing::warn!(product_id, title = %product.title, error = %err, "product update failed");
        }
    }
}

async fn create<S>(
    storefront: &S,
    product: &PosProduct,
    price: ResolvedPrice,
    key: &str,
    cache: &mut CatalogCache,
    counters: &mut EntityCounters,
) -> Option<i64>
where
    S: Storefront + ?Sized,
{
    let new_product = NewProduct {
        title: product.title.clone(),
        price: price.price,
        compare_at_price: price.compare_at_price,
        barcode: product.barcode.clone(),
        body_html: product.description.clone(),
    };
    match storefront.create_product(&new_product).await {
        Ok(created) => {
            counters.created += 1;
            cache.products.record_created(
                created.product_id,
                product.barcode.as_deref(),
                key,
                ProductSnapshot {
                    title: product.title.clone(),
                    price: price.price,
                    compare_at_price: price.compare_at_price,
                    body_html: product.description.clone(),
                    variant_id: created.variant_id,
                },
            );
            Some(created.product_id)
        }
        Err(err) => {
            counters.failed += 1;
            tracing::warn!(title = %product.title, error = %err, "product creation failed");
            None
        }
    }
}

/// Adds a membership unless already cached. Returns whether the product is
/// in the collection afterwards.
async fn add_to_collection<S>(
    storefront: &S,
    product_id: i64,
    collection_id: i64,
    cache: &mut CatalogCache,
    counters: &mut EntityCounters,
) -> bool
where
    S: Storefront + ?Sized,
{
    if cache.membership.contains(&(product_id, collection_id)) {
        return true;
    }
    match storefront
        .add_product_to_collection(product_id, collection_id)
        .await
    {
        Ok(CollectOutcome::Added | CollectOutcome::AlreadyMember) => {
            cache.membership.insert((product_id, collection_id));
            true
        }
        Err(err) => {
            counters.failed += 1;
            tracing::warn!(product_id, collection_id, error = %err, "failed to add product to collection");
            false
        }
    }
}

/// Deletes storefront products whose keys never appeared in the feed.
///
/// Barcode-keyed entries are checked first, and only count as orphans when
/// the product's title is also absent. Title-keyed entries follow. Products
/// touched in this run are never deleted and each id is attempted once.
async fn delete_orphans<S>(
    storefront: &S,
    products: &ProductCache,
    trace: &FeedTrace,
    counters: &mut EntityCounters,
) where
    S: Storefront + ?Sized,
{
    let mut attempted: HashSet<i64> = HashSet::new();
    let mut candidates: Vec<i64> = Vec::new();

    for (barcode, &product_id) in &products.by_barcode {
        if trace.barcodes.contains(barcode) || trace.touched.contains(&product_id) {
            continue;
        }
        let title_seen = products
            .snapshot(product_id)
            .is_some_and(|s| trace.titles.contains(&title_key(&s.title)));
        if !title_seen && attempted.insert(product_id) {
            candidates.push(product_id);
        }
    }
    for (title, &product_id) in &products.by_title {
        if trace.titles.contains(title) || trace.touched.contains(&product_id) {
            continue;
        }
        if attempted.insert(product_id) {
            candidates.push(product_id);
        }
    }

    for product_id in candidates {
        match storefront.delete_product(product_id).await {
            Ok(()) => {
                counters.deleted += 1;
                tracing::info!(product_id, "orphaned product deleted");
            }
            Err(err) => {
                counters.failed += 1;
                tracing::warn!(product_id, error = %err, "failed to delete orphaned product");
            }
        }
    }
}

/// Compares the remote snapshot with the feed values. An empty feed
/// description never forces an update.
fn needs_update(snapshot: &ProductSnapshot, product: &PosProduct, price: ResolvedPrice) -> bool {
    if snapshot.title != product.title {
        return true;
    }
    if (snapshot.price - price.price).abs() > PRICE_TOLERANCE {
        return true;
    }
    let remote_compare = snapshot.compare_at_price.unwrap_or(Decimal::ZERO);
    let feed_compare = price.compare_at_price.unwrap_or(Decimal::ZERO);
    if (remote_compare - feed_compare).abs() > PRICE_TOLERANCE {
        return true;
    }
    match product.description.as_deref() {
        Some(description) if !description.is_empty() => {
            snapshot.body_html.as_deref().unwrap_or("") != description
        }
        _ => false,
    }
}
