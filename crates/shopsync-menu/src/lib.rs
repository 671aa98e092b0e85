//! Mega-menu generation.
//!
//! A fixed category taxonomy is mapped onto the POS department hierarchy and
//! each node is linked to a storefront collection by name. The output is a
//! Qikify mega-menu JSON document.

pub mod builder;
pub mod document;
pub mod error;
pub mod generate;
pub mod ids;
pub mod index;
pub mod taxonomy;

pub use builder::build_menu;
pub use document::{MenuDocument, MenuNode};
pub use error::MenuError;
pub use generate::{
    export_file_name, generate_menu, render_document, write_export, CollectionSource,
    DepartmentSource, GeneratedMenu, MenuStats,
};
pub use ids::MenuIdGenerator;
pub use index::CollectionIndex;
pub use taxonomy::{Category, CATEGORIES};
