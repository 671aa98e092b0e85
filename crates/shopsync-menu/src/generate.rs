//! Menu generation from live storefront and POS data, plus file export.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use shopsync_core::{Department, SubDepartment};
use shopsync_pos::{PosClient, PosError};
use shopsync_shopify::{Collection, ShopifyClient, ShopifyError};

use crate::builder::build_menu;
use crate::document::MenuDocument;
use crate::error::MenuError;
use crate::ids::MenuIdGenerator;
use crate::index::CollectionIndex;

/// Storefront collections that can be linked from the menu.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Collections holding at least one product.
    async fn fetch_collections(&self) -> Result<Vec<Collection>, ShopifyError>;
}

#[async_trait]
impl CollectionSource for ShopifyClient {
    async fn fetch_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        ShopifyClient::fetch_collections(self).await
    }
}

/// POS department hierarchy.
#[async_trait]
pub trait DepartmentSource: Send + Sync {
    async fn fetch_departments(&self) -> Result<Vec<Department>, PosError>;

    async fn fetch_sub_departments(&self) -> Result<Vec<SubDepartment>, PosError>;
}

#[async_trait]
impl DepartmentSource for PosClient {
    async fn fetch_departments(&self) -> Result<Vec<Department>, PosError> {
        PosClient::fetch_departments(self).await
    }

    async fn fetch_sub_departments(&self) -> Result<Vec<SubDepartment>, PosError> {
        PosClient::fetch_sub_departments(self).await
    }
}

/// Input sizes and output shape of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MenuStats {
    pub collections: usize,
    pub departments: usize,
    pub sub_departments: usize,
    pub categories: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedMenu {
    pub document: MenuDocument,
    pub stats: MenuStats,
}

/// Fetches collections and the department hierarchy, then builds the menu.
///
/// # Errors
///
/// Returns [`MenuError::Catalog`] when collections cannot be listed and
/// [`MenuError::Feed`] when the POS lists cannot be fetched.
pub async fn generate_menu<C, D>(collections: &C, departments: &D) -> Result<GeneratedMenu, MenuError>
where
    C: CollectionSource + ?Sized,
    D: DepartmentSource + ?Sized,
{
    let collections = collections.fetch_collections().await?;
    let department_list = departments.fetch_departments().await?;
    let sub_department_list = departments.fetch_sub_departments().await?;

    let mut stats = MenuStats {
        collections: collections.len(),
        departments: department_list.len(),
        sub_departments: sub_department_list.len(),
        categories: 0,
    };

    let index = CollectionIndex::new(collections);
    let mut ids = MenuIdGenerator::from_os_rng();
    let document = build_menu(&index, &department_list, &sub_department_list, &mut ids);
    stats.categories = document.categories().len();

    tracing::info!(
        collections = stats.collections,
        departments = stats.departments,
        sub_departments = stats.sub_departments,
        categories = stats.categories,
        "mega menu generated"
    );
    Ok(GeneratedMenu { document, stats })
}

/// `qikify_mega_menu_YYYY-MM-DD_HH-MM-SS.json` for the given local time.
#[must_use]
pub fn export_file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "qikify_mega_menu_{}.json",
        generated_at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Pretty-printed JSON body of a menu export.
///
/// # Errors
///
/// Returns [`MenuError::Serialize`] if serialization fails.
pub fn render_document(document: &MenuDocument) -> Result<String, MenuError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Writes the document into `dir` (created if missing) and returns the path.
///
/// # Errors
///
/// Returns [`MenuError::Write`] on filesystem failures.
pub async fn write_export(
    dir: &Path,
    document: &MenuDocument,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, MenuError> {
    let body = render_document(document)?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| MenuError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(export_file_name(generated_at));
    tokio::fs::write(&path, body)
        .await
        .map_err(|source| MenuError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::info!(path = %path.display(), "mega menu exported");
    Ok(path)
}
