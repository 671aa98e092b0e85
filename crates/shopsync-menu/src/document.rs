//! Qikify mega-menu document model.
//!
//! Only the node tree varies with input; everything on [`MenuDocument`]
//! outside `megamenu` is fixed presentation metadata.

use serde::{Deserialize, Serialize};
use shopsync_shopify::Collection;

const NAVIGATOR_ITEMS: [&str; 4] = ["/", "/collections/all", "/collections", "/pages/contact"];
const NAVIGATOR_SELECTOR: &str = ".header__inline-menu";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: String,
    pub setting: NodeSetting,
    pub menus: Vec<MenuNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_submenu: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSetting {
    pub item_layout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu_mega_position: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu_flyout_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<MenuUrl>,
}

impl NodeSetting {
    fn text(title: &str) -> Self {
        Self {
            item_layout: "text".to_owned(),
            submenu_type: None,
            submenu_mega_position: None,
            title: title.to_owned(),
            submenu_flyout_width: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuUrl {
    #[serde(rename = "type")]
    pub kind: UrlKind,
    pub collection: CollectionLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlKind {
    pub id: String,
}

/// Storefront collection a node links to. Ids are rendered as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLink {
    pub id: String,
    pub title: String,
    pub handle: String,
}

impl From<&Collection> for MenuUrl {
    fn from(collection: &Collection) -> Self {
        Self {
            kind: UrlKind {
                id: "collection".to_owned(),
            },
            collection: CollectionLink {
                id: collection.id.to_string(),
                title: collection.title.clone(),
                handle: collection.handle.clone(),
            },
        }
    }
}

impl MenuNode {
    /// Leaf linking straight to a collection (sub-department level).
    #[must_use]
    pub fn leaf(id: String, title: &str, collection: &Collection) -> Self {
        let mut setting = NodeSetting::text(title);
        setting.url = Some(MenuUrl::from(collection));
        Self {
            id,
            setting,
            menus: Vec::new(),
            hide_submenu: None,
        }
    }

    /// Inner node with an optional collection link of its own.
    #[must_use]
    pub fn branch(
        id: String,
        title: &str,
        collection: Option<&Collection>,
        menus: Vec<MenuNode>,
    ) -> Self {
        let mut setting = NodeSetting::text(title);
        setting.url = collection.map(MenuUrl::from);
        Self {
            id,
            setting,
            menus,
            hide_submenu: Some(false),
        }
    }

    /// The fixed "Products" flyout that holds every category.
    #[must_use]
    pub fn products_root(id: String, categories: Vec<MenuNode>) -> Self {
        let mut setting = NodeSetting::text("Products");
        setting.submenu_type = Some("flyout".to_owned());
        setting.submenu_mega_position = Some("fullwidth".to_owned());
        setting.submenu_flyout_width = Some("200".to_owned());
        Self {
            id,
            setting,
            menus: categories,
            hide_submenu: Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_size: String,
    pub letter_spacing: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: "14".to_owned(),
            letter_spacing: "0".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    pub id: String,
    pub title: String,
    pub items: Vec<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            id: "main-menu".to_owned(),
            title: "Main menu".to_owned(),
            items: NAVIGATOR_ITEMS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct MenuDocument {
    pub menu_selector: String,
    pub theme_selector: String,
    pub transition: String,
    pub trigger: String,
    pub show_indicator: bool,
    pub show_mobile_indicator: bool,
    pub submenu_background: String,
    pub item_color: String,
    pub item_hover_color: String,
    pub item_header_border: String,
    pub price_color: String,
    pub menu_height: u32,
    pub alignment: String,
    pub root_typography: Typography,
    pub root_padding: u32,
    pub submenu_fullwidth: bool,
    pub typography: Typography,
    pub megamenu: Vec<MenuNode>,
    pub navigator: Navigator,
    pub enable_quickview: bool,
    pub orientation: String,
    pub mobile_navigator: Navigator,
    pub navigator_selector: String,
    pub mobile_navigator_selector: String,
    pub menu_wrap: bool,
}

impl MenuDocument {
    /// Wraps the root node in the fixed presentation settings.
    #[must_use]
    pub fn new(root: MenuNode) -> Self {
        Self {
            menu_selector: "selector".to_owned(),
            theme_selector: "all".to_owned(),
            transition: "fade".to_owned(),
            trigger: "hover".to_owned(),
            show_indicator: true,
            show_mobile_indicator: true,
            submenu_background: "#ffffff".to_owned(),
            item_color: "#000000".to_owned(),
            item_hover_color: "#000000".to_owned(),
            item_header_border: "#000000".to_owned(),
            price_color: "#00992b".to_owned(),
            menu_height: 50,
            alignment: "left".to_owned(),
            root_typography: Typography::default(),
            root_padding: 10,
            submenu_fullwidth: true,
            typography: Typography::default(),
            megamenu: vec![root],
            navigator: Navigator::default(),
            enable_quickview: false,
            orientation: "horizontal".to_owned(),
            mobile_navigator: Navigator::default(),
            navigator_selector: NAVIGATOR_SELECTOR.to_owned(),
            mobile_navigator_selector: NAVIGATOR_SELECTOR.to_owned(),
            menu_wrap: true,
        }
    }

    /// Category nodes under the "Products" root.
    #[must_use]
    pub fn categories(&self) -> &[MenuNode] {
        self.megamenu.first().map_or(&[], |root| root.menus.as_slice())
    }
}
