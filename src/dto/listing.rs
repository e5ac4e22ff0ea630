use serde::Serialize;

use crate::domain::listing::{Pagination, Stats};
use crate::pagination::PageLinks;
use crate::resource::Resource;

/// Edit modal as rendered by the templates.
#[derive(Clone, Debug, Serialize)]
pub struct EditView<D> {
    pub draft: D,
    pub error: Option<String>,
}

/// Everything a list template needs to render one screen.
#[derive(Clone, Debug, Serialize)]
pub struct ListPageData<T, F, D> {
    pub filters: F,
    /// Rows after client-side narrowing.
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
    pub links: PageLinks,
    pub stats: Stats,
    /// Dropdown options derived from the fetched page.
    pub options: Vec<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub edit: Option<EditView<D>>,
}

pub type ScreenPage<R> =
    ListPageData<<R as Resource>::Item, <R as Resource>::Filters, <R as Resource>::Draft>;
