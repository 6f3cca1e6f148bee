/*
[INPUT]:  List params and a page-fetching closure
[OUTPUT]: Stream of items across every page
[POS]:    HTTP layer - page-number pagination helpers
[UPDATE]: When list endpoints change their paging scheme
*/

use std::future::Future;

use futures_util::stream::{self, Stream, TryStreamExt};
use tracing::debug;

use super::query::QueryParams;
use super::{Result, StraddleError};
use crate::types::Page;

/// List params that address a page by number (1-based).
pub trait Paginated: QueryParams + Clone {
    fn page_number(&self) -> Option<u32>;

    /// Copy of `self` asking for `page_number`, other filters unchanged
    fn with_page_number(&self, page_number: u32) -> Self;
}

/// Walk pages starting at `params`, yielding items in order.
///
/// Stops after the last page or at the first error, which is yielded.
pub fn paginate<'a, P, T, F, Fut>(params: P, fetch: F) -> impl Stream<Item = Result<T>> + 'a
where
    P: Paginated + 'a,
    T: 'a,
    F: Fn(P) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    stream::try_unfold((fetch, Some(params)), |(fetch, next)| async move {
        let Some(params) = next else {
            return Ok::<_, StraddleError>(None);
        };
        let page = fetch(params.clone()).await?;
        debug!(
            page_number = page.meta.page_number,
            total_pages = page.meta.total_pages,
            items = page.data.len(),
            "fetched page"
        );
        let next = page
            .next_page_number()
            .map(|number| params.with_page_number(number));
        Ok(Some((page.data, (fetch, next))))
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, StraddleError>)))
    .try_flatten()
}
