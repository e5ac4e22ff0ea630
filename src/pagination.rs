use serde::Serialize;

use crate::domain::listing::Pagination;

fn get_pages(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = left_edge.saturating_add(1).min(last_page.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(last_page.saturating_add(1));

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge).saturating_add(1));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page numbers rendered under a list; `None` marks a gap.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PageLinks {
    pub pages: Vec<Option<u32>>,
    pub page: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageLinks {
    /// Links for the server pagination of the last fetch; empty without one.
    pub fn new(pagination: Option<&Pagination>) -> Self {
        let Some(pagination) = pagination else {
            return Self::default();
        };
        let page = pagination.page.max(1);

        Self {
            pages: get_pages(pagination.total_pages, page, 2, 2, 4, 2),
            page,
            has_prev: pagination.has_prev_page,
            has_next: pagination.has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(page: u32, total_pages: u32) -> Pagination {
        Pagination {
            page,
            limit: 10,
            total_items: u64::from(total_pages) * 10,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    #[test]
    fn short_lists_show_every_page() {
        let links = PageLinks::new(Some(&pagination(1, 3)));
        assert_eq!(links.pages, vec![Some(1), Some(2), Some(3)]);
        assert!(!links.has_prev);
        assert!(links.has_next);
    }

    #[test]
    fn long_lists_collapse_into_gaps() {
        let links = PageLinks::new(Some(&pagination(10, 20)));
        assert_eq!(
            links.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn extreme_page_numbers_do_not_overflow() {
        let links = PageLinks::new(Some(&pagination(u32::MAX, u32::MAX)));
        assert_eq!(
            links.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(u32::MAX - 2),
                Some(u32::MAX - 1),
                Some(u32::MAX),
            ]
        );

        let beyond = PageLinks::new(Some(&pagination(u32::MAX, 5)));
        assert_eq!(beyond.pages[..2], [Some(1), Some(2)]);
    }

    #[test]
    fn missing_pagination_renders_nothing() {
        assert_eq!(PageLinks::new(None), PageLinks::default());
    }
}
