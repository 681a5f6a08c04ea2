//! レポート画面1つ分の状態
//!
//! カテゴリ・フィルタ・取得済みの行・列選択・検索語・ページ位置をまとめて持つ。
//! 取得はチケット番号で管理し、後から発行したチケットがある場合は古い応答を捨てる。

use crate::category::{category_or_default, ReportCategory};
use crate::columns::ColumnSelection;
use crate::error::Result;
use crate::export::ExportTable;
use crate::filter::FilterState;
use crate::projector::ReportRow;
use crate::search::{self, PageInfo, DEFAULT_PAGE_SIZE};

/// 取得リクエストの通し番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationTicket(u64);

/// 行の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSet {
    /// まだ生成していない
    NotGenerated,
    /// 取得済み（0件もありうる）
    Loaded(Vec<ReportRow>),
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    category: &'static ReportCategory,
    filters: FilterState,
    rows: RowSet,
    columns: ColumnSelection,
    search_query: String,
    page: usize,
    page_size: usize,
    last_ticket: u64,
}

impl ReportSession {
    /// 未知のIDは車両管理カテゴリとして開く
    pub fn new(category_id: Option<&str>) -> Self {
        let category = category_or_default(category_id);
        Self {
            category,
            filters: FilterState::for_category(category),
            rows: RowSet::NotGenerated,
            columns: ColumnSelection::for_category(category),
            search_query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            last_ticket: 0,
        }
    }

    pub fn category(&self) -> &'static ReportCategory {
        self.category
    }

    /// カテゴリ変更: フィルタ・行・列選択・検索をすべて初期化
    pub fn select_category(&mut self, category_id: &str) {
        let page_size = self.page_size;
        let last_ticket = self.last_ticket;
        *self = Self::new(Some(category_id));
        self.page_size = page_size;
        // 切り替え前に出したリクエストの応答は捨てる
        self.last_ticket = last_ticket + 1;
    }

    /// キャンセル: フィルタと行を破棄
    pub fn cancel(&mut self) {
        self.filters.clear();
        self.rows = RowSet::NotGenerated;
        self.search_query.clear();
        self.page = 1;
        self.last_ticket += 1;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn columns(&self) -> &ColumnSelection {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnSelection {
        &mut self.columns
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    /// 取得開始。以前のチケットはこの時点で古くなる
    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.last_ticket += 1;
        GenerationTicket(self.last_ticket)
    }

    /// まだ最新の取得か
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        ticket.0 == self.last_ticket
    }

    /// 取得成功。最新のチケットでなければ捨てて false
    pub fn complete_generation(&mut self, ticket: GenerationTicket, rows: Vec<ReportRow>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.last_ticket,
                "dropping stale report response"
            );
            return false;
        }
        self.rows = RowSet::Loaded(rows);
        self.page = 1;
        true
    }

    /// 検索語を設定（1ページ目に戻る）
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.page = 1;
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        self.page_size = search::validate_page_size(size)?;
        self.page = 1;
        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 検索後の全行
    pub fn filtered_rows(&self) -> Vec<&ReportRow> {
        match &self.rows {
            RowSet::NotGenerated => Vec::new(),
            RowSet::Loaded(rows) => search::search(self.category, rows, &self.search_query),
        }
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.page_size, self.filtered_rows().len())
    }

    /// 指定ページへ移動（範囲外は端に寄せる）
    pub fn go_to_page(&mut self, page: usize) {
        self.page = PageInfo::new(page, self.page_size, self.filtered_rows().len()).page;
    }

    /// 次のページへ。最終ページなら何もしない
    pub fn next_page(&mut self) -> bool {
        let info = self.page_info();
        if info.has_next() {
            self.page = info.page + 1;
            true
        } else {
            false
        }
    }

    /// 前のページへ。1ページ目なら何もしない
    pub fn prev_page(&mut self) -> bool {
        let info = self.page_info();
        if info.has_prev() {
            self.page = info.page - 1;
            true
        } else {
            false
        }
    }

    /// 現在のページに表示する行
    pub fn visible_rows(&self) -> Vec<&ReportRow> {
        let filtered = self.filtered_rows();
        let info = PageInfo::new(self.page, self.page_size, filtered.len());
        search::paginate(&filtered, info.page, self.page_size).to_vec()
    }

    /// 出力用の表（選択列 × 検索後の全行）
    pub fn export_table(&self) -> ExportTable {
        ExportTable::build(
            self.category,
            self.columns.selected(),
            self.filtered_rows(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSlot;
    use crate::projector::project;
    use crate::record::RawRecord;
    use chrono::NaiveDate;
    use serde_json::json;

    fn vehicle_rows(count: usize) -> Vec<ReportRow> {
        let category = category_or_default(None);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        (0..count)
            .map(|i| {
                let reg = if i % 2 == 0 { format!("GR-{}", i) } else { format!("AS-{}", i) };
                project(category, &RawRecord::new(json!({"id": i, "reg_number": reg})), today)
            })
            .collect()
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut session = ReportSession::new(None);
        let first = session.begin_generation();
        let second = session.begin_generation();
        assert!(session.complete_generation(second, vehicle_rows(3)));
        assert!(!session.complete_generation(first, vehicle_rows(1)));
        assert_eq!(session.filtered_rows().len(), 3);
    }

    #[test]
    fn test_category_change_resets_state() {
        let mut session = ReportSession::new(Some("driver"));
        session.filters_mut().set_slot(FilterSlot::Year, "Jane");
        let ticket = session.begin_generation();
        session.select_category("accident");
        assert!(!session.complete_generation(ticket, vehicle_rows(2)));
        assert_eq!(session.category().id, "accident");
        assert!(session.filters().is_empty());
        assert_eq!(session.rows(), &RowSet::NotGenerated);
        assert_eq!(
            session.columns().selected(),
            session.category().default_selection().as_slice()
        );
    }

    #[test]
    fn test_cancel_discards_rows_and_filters() {
        let mut session = ReportSession::new(None);
        session.filters_mut().set("year", "2020").unwrap();
        let ticket = session.begin_generation();
        session.complete_generation(ticket, vehicle_rows(4));
        session.cancel();
        assert!(session.filters().is_empty());
        assert!(session.filtered_rows().is_empty());
    }

    #[test]
    fn test_export_uses_filtered_not_paginated_rows() {
        let mut session = ReportSession::new(None);
        let ticket = session.begin_generation();
        session.complete_generation(ticket, vehicle_rows(30));
        session.set_search("gr-");
        assert_eq!(session.visible_rows().len(), 10);
        let table = session.export_table();
        assert_eq!(table.len(), 15);
        assert_eq!(table.width(), 1 + session.columns().selected().len());
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut session = ReportSession::new(None);
        let ticket = session.begin_generation();
        session.complete_generation(ticket, vehicle_rows(23));
        assert!(!session.prev_page());
        assert!(session.next_page());
        assert!(session.next_page());
        assert_eq!(session.page_info().page, 3);
        assert!(!session.next_page());
        assert_eq!(session.visible_rows().len(), 3);

        session.go_to_page(0);
        assert_eq!(session.page_info().page, 1);
        session.go_to_page(42);
        assert_eq!(session.page_info().page, 3);
    }

    #[test]
    fn test_page_size_menu() {
        let mut session = ReportSession::new(None);
        assert!(session.set_page_size(25).is_ok());
        assert!(session.set_page_size(30).is_err());
        assert_eq!(session.page_size(), 25);
    }

    #[test]
    fn test_empty_result_is_loaded() {
        let mut session = ReportSession::new(Some("pool"));
        let ticket = session.begin_generation();
        assert!(session.complete_generation(ticket, Vec::new()));
        assert_eq!(session.rows(), &RowSet::Loaded(Vec::new()));
        assert_eq!(session.page_info().page_count, 0);
    }
}
