//! End-to-end reconciliation runs against an in-memory storefront.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shopsync_core::{Department, PosId, PosProduct, SubDepartment};
use shopsync_pos::{PosError, PosFeed};
use shopsync_shopify::types::{Product, Variant};
use shopsync_shopify::{
    CollectOutcome, CollectionMembership, CreatedProduct, NewProduct, ProductCache, ProductUpdate,
    ShopifyError,
};
use shopsync_sync::{run_product_sync, FeedSource, Storefront, SyncError, SyncOptions};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    next_id: i64,
    collections: Vec<(i64, String, Option<i64>)>,
    products: Vec<Product>,
    membership: CollectionMembership,
    deleted: Vec<i64>,
    mutations: Vec<String>,
}

#[derive(Default)]
struct FakeStorefront {
    state: Mutex<State>,
    fail_catalog: bool,
    fail_create_titles: HashSet<String>,
    duplicate_collections: HashSet<i64>,
}

fn rejected(url: &str) -> ShopifyError {
    ShopifyError::UnexpectedStatus {
        status: 422,
        url: url.to_owned(),
        body: r#"{"errors":"rejected"}"#.to_owned(),
    }
}

impl FakeStorefront {
    fn with_product(self, id: i64, title: &str, barcode: Option<&str>, price: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(id);
            state.products.push(Product {
                id,
                title: title.to_owned(),
                body_html: None,
                variants: vec![Variant {
                    id: id * 10,
                    barcode: barcode.map(ToOwned::to_owned),
                    price: Some(price.parse().unwrap()),
                    compare_at_price: None,
                }],
            });
        }
        self
    }

    fn with_collection(self, id: i64, title: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(id);
            state.collections.push((id, title.to_owned(), None));
        }
        self
    }

    fn collection_id(&self, title: &str) -> i64 {
        let state = self.state.lock().unwrap();
        state
            .collections
            .iter()
            .find(|(_, t, _)| t == title)
            .map(|(id, _, _)| *id)
            .unwrap()
    }

    fn product_id(&self, title: &str) -> i64 {
        let state = self.state.lock().unwrap();
        state.products.iter().find(|p| p.title == title).unwrap().id
    }

    fn mutations(&self) -> Vec<String> {
        self.state.lock().unwrap().mutations.clone()
    }

    fn deleted(&self) -> Vec<i64> {
        self.state.lock().unwrap().deleted.clone()
    }
}

#[async_trait]
impl Storefront for FakeStorefront {
    async fn build_product_cache(&self) -> Result<ProductCache, ShopifyError> {
        if self.fail_catalog {
            return Err(rejected("products.json"));
        }
        Ok(ProductCache::from_products(&self.state.lock().unwrap().products))
    }

    async fn build_collection_membership(&self) -> Result<CollectionMembership, ShopifyError> {
        Ok(self.state.lock().unwrap().membership.clone())
    }

    async fn find_collection_by_title(&self, title: &str) -> Result<Option<i64>, ShopifyError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .collections
            .iter()
            .find(|(_, t, _)| t.eq_ignore_ascii_case(title))
            .map(|(id, _, _)| *id))
    }

    async fn create_collection(
        &self,
        title: &str,
        parent_collection_id: Option<i64>,
    ) -> Result<i64, ShopifyError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state
            .collections
            .push((id, title.to_owned(), parent_collection_id));
        state.mutations.push(format!("create_collection:{title}"));
        Ok(id)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError> {
        if self.fail_create_titles.contains(&product.title) {
            return Err(rejected("products.json"));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.products.push(Product {
            id,
            title: product.title.clone(),
            body_html: product.body_html.clone().filter(|b| !b.is_empty()),
            variants: vec![Variant {
                id: id * 10,
                barcode: product.barcode.clone(),
                price: Some(product.price),
                compare_at_price: product.compare_at_price,
            }],
        });
        state.mutations.push(format!("create_product:{}", product.title));
        Ok(CreatedProduct {
            product_id: id,
            variant_id: Some(id * 10),
        })
    }

    async fn update_product(&self, update: &ProductUpdate) -> Result<(), ShopifyError> {
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == update.product_id)
            .ok_or_else(|| rejected("products/{id}.json"))?;
        product.title.clone_from(&update.title);
        if let Some(variant) = product.variants.first_mut() {
            variant.price = Some(update.price);
            variant.compare_at_price = update.compare_at_price;
        }
        state.mutations.push(format!("update_product:{}", update.product_id));
        Ok(())
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), ShopifyError> {
        let mut state = self.state.lock().unwrap();
        state.products.retain(|p| p.id != product_id);
        state.deleted.push(product_id);
        state.mutations.push(format!("delete_product:{product_id}"));
        Ok(())
    }

    async fn add_product_to_collection(
        &self,
        product_id: i64,
        collection_id: i64,
    ) -> Result<CollectOutcome, ShopifyError> {
        let mut state = self.state.lock().unwrap();
        state.membership.insert((product_id, collection_id));
        state
            .mutations
            .push(format!("collect:{product_id}:{collection_id}"));
        if self.duplicate_collections.contains(&collection_id) {
            Ok(CollectOutcome::AlreadyMember)
        } else {
            Ok(CollectOutcome::Added)
        }
    }
}

struct FakeFeed(Result<PosFeed, ()>);

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch_feed(&self) -> Result<PosFeed, PosError> {
        self.0
            .clone()
            .map_err(|()| PosError::Api("Token missing".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn id(raw: &str) -> PosId {
    PosId::new(raw).unwrap()
}

fn departments() -> Vec<Department> {
    vec![
        Department {
            id: id("D1"),
            title: "Dogs".to_owned(),
            group_id: None,
        },
        Department {
            id: id("D2"),
            title: "Cats".to_owned(),
            group_id: None,
        },
    ]
}

fn sub_departments() -> Vec<SubDepartment> {
    vec![SubDepartment {
        id: Some(id("S1")),
        department_id: id("D1"),
        title: "Dry Food".to_owned(),
    }]
}

fn item(title: &str, barcode: Option<&str>, price: i64, dept: &str, sub: Option<&str>) -> PosProduct {
    PosProduct {
        title: title.to_owned(),
        barcode: barcode.map(ToOwned::to_owned),
        description: Some(format!("<p>{title}</p>")),
        department_id: Some(id(dept)),
        sub_department_id: sub.map(id),
        store_promo_price: None,
        store_unit_price: Some(Decimal::new(price, 2)),
        web_unit_price: None,
    }
}

fn feed(products: Vec<PosProduct>) -> FakeFeed {
    FakeFeed(Ok(PosFeed {
        departments: departments(),
        sub_departments: sub_departments(),
        products,
    }))
}

fn options() -> SyncOptions {
    SyncOptions {
        throttle_every: 0,
        throttle_pause: Duration::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_run_creates_everything_and_second_run_is_a_no_op() {
    let storefront = FakeStorefront::default().with_collection(1, "Cats");
    let source = feed(vec![
        item("Kibble", Some("111"), 1999, "D1", Some("S1")),
        item("Cat Nip", None, 499, "D2", None),
    ]);

    let first = run_product_sync(&source, &storefront, &options()).await.unwrap();
    assert_eq!(first.departments.created, 1);
    assert_eq!(first.departments.existing, 1);
    assert_eq!(first.sub_departments.created, 1);
    assert_eq!(first.products.created, 2);
    assert_eq!(first.failures(), 0);

    let dogs = storefront.collection_id("Dogs");
    let dry = storefront.collection_id("Dry Food");
    let kibble = storefront.product_id("Kibble");
    {
        let state = storefront.state.lock().unwrap();
        let sub = state.collections.iter().find(|c| c.0 == dry).unwrap();
        assert_eq!(sub.2, Some(dogs), "sub-department annotated with parent");
        assert!(state.membership.contains(&(kibble, dogs)));
        assert!(state.membership.contains(&(kibble, dry)));
    }

    let before = storefront.mutations().len();
    let second = run_product_sync(&source, &storefront, &options()).await.unwrap();
    assert_eq!(second.departments.existing, 2);
    assert_eq!(second.sub_departments.existing, 1);
    assert_eq!(second.products.skipped, 2);
    assert_eq!(second.products.mutations(), 0);
    assert_eq!(storefront.mutations().len(), before, "second run must not mutate");
}

#[tokio::test]
async fn barcode_match_takes_precedence_over_title() {
    let storefront = FakeStorefront::default()
        .with_product(10, "Old Name", Some("555"), "19.99")
        .with_product(11, "New Name", None, "5.00");
    let source = feed(vec![item("New Name", Some("555"), 1999, "D1", None)]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.updated, 1);
    assert_eq!(report.products.created, 0);
    assert!(storefront.mutations().contains(&"update_product:10".to_owned()));
    assert!(
        storefront.deleted().is_empty(),
        "product 11 keeps its title in the feed and survives"
    );
}

#[tokio::test]
async fn orphan_is_deleted_exactly_once() {
    let storefront = FakeStorefront::default()
        .with_product(20, "Discontinued", Some("999"), "3.00")
        .with_product(21, "Kibble", Some("111"), "19.99");
    let source = feed(vec![item("Kibble", Some("111"), 1999, "D1", None)]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.deleted, 1);
    assert_eq!(storefront.deleted(), vec![20]);
}

#[tokio::test]
async fn product_whose_title_is_in_feed_survives_barcode_pass() {
    // Two storefront products share a title; the title index points at 31.
    let storefront = FakeStorefront::default()
        .with_product(30, "Dog Food", Some("OLD"), "9.00")
        .with_product(31, "Dog Food", None, "9.00");
    let source = feed(vec![item("Dog Food", None, 900, "D1", None)]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.deleted, 0);
    assert!(storefront.deleted().is_empty());
}

#[tokio::test]
async fn duplicate_feed_entries_reuse_product_created_earlier_in_run() {
    let storefront = FakeStorefront::default();
    let source = feed(vec![
        item("Kibble", Some("111"), 1999, "D1", None),
        item("Kibble", Some("111"), 1999, "D1", None),
    ]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.created, 1);
    assert_eq!(report.products.skipped, 1);
    let creates = storefront
        .mutations()
        .iter()
        .filter(|m| m.starts_with("create_product"))
        .count();
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn repeated_entry_after_update_is_skipped() {
    let storefront = FakeStorefront::default().with_product(10, "Kibble", Some("555"), "19.99");
    let source = feed(vec![
        item("Kibble", Some("555"), 2499, "D1", None),
        item("Kibble", Some("555"), 2499, "D1", None),
    ]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.updated, 1);
    assert_eq!(report.products.skipped, 1);
    let updates = storefront
        .mutations()
        .iter()
        .filter(|m| m.starts_with("update_product"))
        .count();
    assert_eq!(updates, 1);
}

#[tokio::test]
async fn sub_department_without_id_gets_no_collection() {
    let storefront = FakeStorefront::default();
    let mut subs = sub_departments();
    subs.push(SubDepartment {
        id: None,
        department_id: id("D1"),
        title: "Chews".to_owned(),
    });
    let source = FakeFeed(Ok(PosFeed {
        departments: departments(),
        sub_departments: subs,
        products: vec![item("Kibble", Some("111"), 1999, "D1", Some("S1"))],
    }));

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.sub_departments.created, 1);
    assert_eq!(report.sub_departments.failed, 0);
    assert!(!storefront
        .mutations()
        .contains(&"create_collection:Chews".to_owned()));
}

#[tokio::test]
async fn already_member_collect_is_not_a_failure() {
    let mut storefront = FakeStorefront::default().with_collection(1, "Dogs");
    storefront.duplicate_collections.insert(1);
    let source = feed(vec![item("Kibble", None, 1999, "D1", None)]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.failed, 0);
    assert_eq!(report.products.created, 1);
}

#[tokio::test]
async fn failed_create_is_counted_and_run_continues() {
    let mut storefront = FakeStorefront::default();
    storefront.fail_create_titles.insert("Broken".to_owned());
    let source = feed(vec![
        item("Broken", None, 100, "D1", None),
        item("Fine", None, 200, "D1", None),
    ]);

    let report = run_product_sync(&source, &storefront, &options()).await.unwrap();

    assert_eq!(report.products.failed, 1);
    assert_eq!(report.products.created, 1);
    assert_eq!(report.failures(), 1);
}

#[tokio::test]
async fn empty_sub_department_list_aborts_before_any_call() {
    let storefront = FakeStorefront::default();
    let source = FakeFeed(Ok(PosFeed {
        departments: departments(),
        sub_departments: Vec::new(),
        products: vec![item("Kibble", None, 100, "D1", None)],
    }));

    let err = run_product_sync(&source, &storefront, &options())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::EmptyFeed("sub-departments")), "got {err:?}");
    assert!(storefront.mutations().is_empty());
}

#[tokio::test]
async fn feed_failure_is_reported_as_feed_error() {
    let storefront = FakeStorefront::default();
    let err = run_product_sync(&FakeFeed(Err(())), &storefront, &options())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Feed(_)), "got {err:?}");
}

#[tokio::test]
async fn catalog_failure_aborts_before_mutation() {
    let storefront = FakeStorefront {
        fail_catalog: true,
        ..FakeStorefront::default()
    };
    let source = feed(vec![item("Kibble", None, 100, "D1", None)]);

    let err = run_product_sync(&source, &storefront, &options())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Catalog(_)), "got {err:?}");
    assert!(storefront.mutations().is_empty());
}
