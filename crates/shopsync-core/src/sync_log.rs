use serde::{Deserialize, Serialize};

/// Named actions whose last successful completion is recorded in the sync log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    SyncProducts,
    MegaMenu,
}

impl SyncAction {
    pub const ALL: [SyncAction; 2] = [SyncAction::SyncProducts, SyncAction::MegaMenu];

    /// Value stored in the `sync_logs.action` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncAction::SyncProducts => "sync_products",
            SyncAction::MegaMenu => "mega_menu",
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
