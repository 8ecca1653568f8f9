use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// 单页最大条数
pub const MAX_PAGE_SIZE: i64 = 100;

/// 规范化分页参数，返回 (页码, 每页条数)，页码从 1 开始
pub fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64;
    (page, size)
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }

    /// 空结果
    pub fn empty(page: u64, size: u64) -> Self {
        Self::new(page, size, 0, 0)
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page_defaults() {
        assert_eq!(normalize_page(None, None), (1, 10));
    }

    #[test]
    fn test_normalize_page_clamps_bounds() {
        assert_eq!(normalize_page(Some(0), Some(500)), (1, 100));
        assert_eq!(normalize_page(Some(-4), Some(0)), (1, 1));
        assert_eq!(normalize_page(Some(3), Some(25)), (3, 25));
    }
}
