//! Paginated bulk retrieval.
//!
//! Requests fixed-size pages with an increasing offset until the offset
//! reaches the total declared by the last response. A failed page discards
//! everything accumulated so far.

use std::future::Future;

use crate::remote::types::{Listing, RemoteResult};

/// Items requested per page.
pub const PAGE_SIZE: usize = 100;

/// Collect every item of a paginated collection, in server order.
///
/// `fetch_page` receives `(offset, limit)`. A `total` of zero still costs one
/// request, the first page is what confirms the collection is empty.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> RemoteResult<Vec<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = RemoteResult<Listing<T>>>,
{
    let mut items = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch_page(offset, PAGE_SIZE).await?;
        items.extend(page.items);
        offset += PAGE_SIZE;
        if offset >= page.total {
            break;
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::RemoteError;
    use std::sync::Mutex;

    /// Serves `0..total` in pages, recording the requested offsets.
    fn serve(total: usize, offsets: &Mutex<Vec<usize>>, offset: usize, limit: usize) -> RemoteResult<Listing<usize>> {
        offsets.lock().unwrap().push(offset);
        let end = (offset + limit).min(total);
        Ok(Listing {
            items: (offset.min(end)..end).collect(),
            total,
        })
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        let offsets = Mutex::new(Vec::new());
        let items = fetch_all(|offset, limit| {
            let page = serve(101, &offsets, offset, limit);
            async move { page }
        })
        .await
        .unwrap();

        assert_eq!(*offsets.lock().unwrap(), vec![0, 100]);
        assert_eq!(items.len(), 101);
        assert_eq!(items, (0..101).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_exact_multiple() {
        let offsets = Mutex::new(Vec::new());
        let items = fetch_all(|offset, limit| {
            let page = serve(200, &offsets, offset, limit);
            async move { page }
        })
        .await
        .unwrap();

        assert_eq!(*offsets.lock().unwrap(), vec![0, 100]);
        assert_eq!(items.len(), 200);
    }

    #[tokio::test]
    async fn test_empty_collection_single_request() {
        let offsets = Mutex::new(Vec::new());
        let items = fetch_all(|offset, limit| {
            let page = serve(0, &offsets, offset, limit);
            async move { page }
        })
        .await
        .unwrap();

        assert_eq!(*offsets.lock().unwrap(), vec![0]);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_page_aborts() {
        let offsets = Mutex::new(Vec::new());
        let result: RemoteResult<Vec<usize>> = fetch_all(|offset, limit| {
            let page = if offset >= 200 {
                Err(RemoteError::InvalidVersion("boom".to_string()))
            } else {
                serve(350, &offsets, offset, limit)
            };
            async move { page }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(*offsets.lock().unwrap(), vec![0, 100]);
    }

    #[tokio::test]
    async fn test_shrinking_total_stops_early() {
        // the collection shrank between pages: trust the latest total
        let calls = Mutex::new(0usize);
        let items = fetch_all(|offset, _limit| {
            *calls.lock().unwrap() += 1;
            let page = if offset == 0 {
                Listing { items: vec![1u8; 100], total: 250 }
            } else {
                Listing { items: vec![2u8; 50], total: 150 }
            };
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(items.len(), 150);
    }
}
