//! Result pagination.

use crate::error::Result;
use crate::service::{ExecutionId, QueryService, ResultPage, ResultSet};
use tracing::debug;

/// Rows requested per page.
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Largest page size Athena accepts.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Fetches result pages for a finished execution.
pub struct Paginator<'a> {
    service: &'a dyn QueryService,
    page_size: i32,
}

impl<'a> Paginator<'a> {
    pub fn new(service: &'a dyn QueryService, page_size: i32) -> Self {
        Self { service, page_size }
    }

    /// Returns a cursor over the result pages of `id`.
    pub fn pages(&self, id: &'a ExecutionId) -> ResultPages<'a> {
        ResultPages {
            service: self.service,
            id,
            page_size: self.page_size,
            next_token: None,
            fetched: 0,
            finished: false,
        }
    }

    /// Fetches every page and concatenates the rows in fetch order.
    ///
    /// Column metadata is taken from the first page only. On any fetch error the
    /// rows gathered so far are dropped.
    pub async fn fetch_all(&self, id: &'a ExecutionId) -> Result<ResultSet> {
        let mut pages = self.pages(id);
        let mut result = ResultSet::default();
        let mut first = true;

        while let Some(page) = pages.next_page().await? {
            if first {
                result.columns = page.columns.unwrap_or_default();
                first = false;
            }
            result.rows.extend(page.rows);
        }
        result.page_count = pages.fetched();

        debug!(
            execution_id = %id,
            pages = result.page_count,
            rows = result.rows.len(),
            "Fetched all result pages"
        );
        Ok(result)
    }
}

/// Cursor over result pages. Finite and not restartable.
pub struct ResultPages<'a> {
    service: &'a dyn QueryService,
    id: &'a ExecutionId,
    page_size: i32,
    next_token: Option<String>,
    fetched: usize,
    finished: bool,
}

impl ResultPages<'_> {
    /// Fetches the next page, or returns `None` once the last page has been seen.
    pub async fn next_page(&mut self) -> Result<Option<ResultPage>> {
        if self.finished {
            return Ok(None);
        }

        let page = self
            .service
            .get_query_results(self.id, self.next_token.as_deref(), self.page_size)
            .await?;
        self.fetched += 1;
        debug!(
            execution_id = %self.id,
            page = self.fetched,
            rows = page.rows.len(),
            "Fetched result page"
        );

        self.next_token = page.next_token.clone().filter(|token| !token.is_empty());
        self.finished = self.next_token.is_none();
        Ok(Some(page))
    }

    /// Number of pages fetched so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }
}
