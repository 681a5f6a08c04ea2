//! 行の検索とページ分割

use crate::category::ReportCategory;
use crate::error::{Error, Result};
use crate::projector::ReportRow;

/// 1ページの表示件数の選択肢
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub fn validate_page_size(size: usize) -> Result<usize> {
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(Error::InvalidPageSize(size))
    }
}

/// 行が検索語に一致するか（カテゴリの検索対象フィールドのいずれかに部分一致、大文字小文字無視）
pub fn matches(category: &ReportCategory, row: &ReportRow, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    category
        .search_fields
        .iter()
        .any(|key| row.get(key).to_lowercase().contains(&needle))
}

pub fn search<'a>(category: &ReportCategory, rows: &'a [ReportRow], query: &str) -> Vec<&'a ReportRow> {
    rows.iter().filter(|row| matches(category, row, query)).collect()
}

/// 総ページ数（0件なら0）
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// 1始まりのページを切り出す。範囲外は空
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (page * page_size).min(items.len());
    &items[start..end]
}

/// ページ位置（前へ・次へが押せるか）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_count = page_count(total, page_size);
        Self {
            page: clamp_page(page, page_count),
            page_count,
            total,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// ページ番号を 1..=page_count に収める（0件なら1）
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}
