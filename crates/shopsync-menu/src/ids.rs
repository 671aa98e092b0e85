use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PREFIX: &str = "tmenu-menu-";

/// Issues `tmenu-menu-NNNNNN` node ids, unique within one document.
#[derive(Debug)]
pub struct MenuIdGenerator<R = StdRng> {
    rng: R,
    issued: HashSet<u32>,
}

impl MenuIdGenerator<StdRng> {
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> MenuIdGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    /// Next unused id; a suffix that was already handed out is re-rolled.
    pub fn next_id(&mut self) -> String {
        loop {
            let suffix: u32 = self.rng.random_range(100_000..=999_999);
            if self.issued.insert(suffix) {
                return format!("{PREFIX}{suffix}");
            }
        }
    }
}
