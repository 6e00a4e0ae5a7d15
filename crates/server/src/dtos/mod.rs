pub mod admin;
pub mod assignment;
pub mod auth;
pub mod directory;
pub mod page;
pub mod subject;
pub mod teacher;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(per_page);
        Self {
            page,
            per_page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Hard deletes must be confirmed explicitly
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}
