use genproto::api::PaginationMeta as PaginationMetaProto;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i32,
    pub limit: i32,
    pub total_pages: i32,
    pub total_items: i32,
}

impl PaginationMeta {
    /// `limit` must be positive; callers validate before reaching here.
    pub fn new(page: i32, limit: i32, total_items: i64) -> Self {
        let limit_wide = limit.max(1) as i64;
        let total_pages = (total_items + limit_wide - 1) / limit_wide;

        Self {
            page,
            limit,
            total_pages: i32::try_from(total_pages).unwrap_or(i32::MAX),
            total_items: i32::try_from(total_items).unwrap_or(i32::MAX),
        }
    }
}

impl From<PaginationMeta> for PaginationMetaProto {
    fn from(value: PaginationMeta) -> Self {
        PaginationMetaProto {
            page: value.page,
            limit: value.limit,
            total_pages: value.total_pages,
            total_items: value.total_items,
        }
    }
}
