use serde::Serialize;

/// Per-entity outcome counts for one run.
///
/// `existing` counts departments and sub-departments whose collection was
/// already present. `failed` counts mutation calls that errored and were
/// skipped over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounters {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub existing: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl EntityCounters {
    /// Entities that ended the run with a usable storefront counterpart.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.existing
    }

    /// Number of create, update, or delete calls that succeeded.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub departments: EntityCounters,
    pub sub_departments: EntityCounters,
    pub products: EntityCounters,
}

impl SyncReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.departments.failed + self.sub_departments.failed + self.products.failed
    }
}
