use serde::Deserialize;

use crate::models::PageParams;

/// Bare `page` / `per_page` query for listings without filters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn params(&self) -> PageParams {
        PageParams::new(self.page, self.per_page)
    }
}
