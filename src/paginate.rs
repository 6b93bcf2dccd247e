//! Page splitting and navigation links.
//!
//! [`paginate`] cuts an ordered sequence into fixed-size slices; concatenating
//! the slices gives back the input. [`build_links`] computes the
//! `nextPage`/`previousPage` links for one of those pages.
//!
//! ## Link Asymmetry
//!
//! Page 1 is written at the collection root as `index.json`, so page 2 points
//! back to a bare `"index.json"` while every other link is prefixed with the
//! base path:
//!
//! ```text
//! page 1: prev = null                 next = vn/posts/page/2.json
//! page 2: prev = index.json           next = vn/posts/page/3.json
//! page 3: prev = vn/posts/page/2.json next = null
//! ```

use crate::types::Pagination;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page {current} is outside 1..={total}")]
    OutOfRange { current: usize, total: usize },
}

/// Split `items` into order-preserving pages of at most `page_size` elements.
///
/// An empty input yields zero pages, not one empty page.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(page_size.get()).collect()
}

/// Number of pages [`paginate`] produces for `len` items.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Build pagination metadata for `current_page` of `total_pages`.
///
/// Pages are 1-indexed. A page number of zero or beyond the total is
/// rejected rather than clamped.
pub fn build_links(
    current_page: usize,
    total_pages: usize,
    base_path: &str,
) -> Result<Pagination, PaginationError> {
    if current_page == 0 || current_page > total_pages {
        return Err(PaginationError::OutOfRange {
            current: current_page,
            total: total_pages,
        });
    }

    let next_page = (current_page < total_pages)
        .then(|| format!("{}/page/{}.json", base_path, current_page + 1));

    let previous_page = match current_page {
        1 => None,
        2 => Some("index.json".to_string()),
        n => Some(format!("{}/page/{}.json", base_path, n - 1)),
    };

    Ok(Pagination {
        current_page,
        total_pages,
        next_page,
        previous_page,
    })
}
