use futures::{Stream, TryStreamExt as _, stream};

use crate::{
    CatalogError,
    spotify::{Client, Page, PlaylistItem},
};

/// Something that can produce pages of a single playlist.
pub trait PageSource {
    /// Fetch up to `limit` items starting at `offset`.
    fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Page<PlaylistItem>, CatalogError>> + Send;
}

/// A lazy, finite stream of playlist pages in increasing offset order.
///
/// Each page starts where the previous one ended. The stream ends once the items
/// seen reach the reported total, or when a page comes back empty. It yields the
/// first error and then ends. Polling a fresh stream restarts from offset 0.
pub fn playlist_pages<P: PageSource>(
    source: &P,
    limit: u32,
) -> impl Stream<Item = Result<Page<PlaylistItem>, CatalogError>> + '_ {
    stream::try_unfold(Some(0u32), move |offset| async move {
        let Some(offset) = offset else {
            return Ok(None);
        };

        let page = source.fetch_page(offset, limit).await?;
        let seen = offset.saturating_add(page.items.len() as u32);
        let next = if page.items.is_empty() {
            if seen < page.total {
                tracing::warn!(
                    "playlist page at offset {offset} was empty, but {} items were reported",
                    page.total
                );
            }
            None
        } else if seen >= page.total {
            None
        } else {
            Some(seen)
        };

        Ok(Some((page, next)))
    })
}

/// Retrieve every item of the playlist, concatenated in page order.
///
/// Any failed page aborts the whole retrieval.
pub async fn fetch_all_items<P: PageSource>(source: &P) -> Result<Vec<PlaylistItem>, CatalogError> {
    playlist_pages(source, Client::PLAYLIST_PAGE_LIMIT)
        .try_fold(Vec::new(), |mut items, page| async move {
            items.extend(page.items);
            Ok(items)
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::TryStreamExt as _;

    use super::*;
    use crate::release::tests::item;

    /// Serves a fixed list of items, recording each requested offset.
    struct FakePages {
        items: Vec<PlaylistItem>,
        total: u32,
        fail_at_offset: Option<u32>,
        requested: Mutex<Vec<u32>>,
    }
    impl FakePages {
        fn new(count: usize) -> Self {
            Self {
                items: (0..count).map(|i| item(&format!("track-{i}"))).collect(),
                total: count as u32,
                fail_at_offset: None,
                requested: Mutex::new(vec![]),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }
    impl PageSource for FakePages {
        async fn fetch_page(
            &self,
            offset: u32,
            limit: u32,
        ) -> Result<Page<PlaylistItem>, CatalogError> {
            self.requested.lock().unwrap().push(offset);
            if self.fail_at_offset == Some(offset) {
                return Err(CatalogError::UpstreamFetch("rate limited".to_string()));
            }

            let start = (offset as usize).min(self.items.len());
            let end = (start + limit as usize).min(self.items.len());
            Ok(Page {
                items: self.items[start..end].to_vec(),
                total: self.total,
                offset,
                limit,
            })
        }
    }

    fn titles(items: &[PlaylistItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| i.track.as_ref().unwrap().name.clone().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_follows_offsets_until_total() {
        let pages = FakePages::new(250);
        let items = fetch_all_items(&pages).await.unwrap();

        assert_eq!(pages.requested(), [0, 100, 200]);
        assert_eq!(items.len(), 250);
        assert_eq!(titles(&items)[0], "track-0");
        assert_eq!(titles(&items)[100], "track-100");
        assert_eq!(titles(&items)[249], "track-249");
    }

    #[tokio::test]
    async fn test_exact_page_multiple_stops_without_extra_request() {
        let pages = FakePages::new(200);
        let items = fetch_all_items(&pages).await.unwrap();
        assert_eq!(pages.requested(), [0, 100]);
        assert_eq!(items.len(), 200);
    }

    #[tokio::test]
    async fn test_empty_playlist_makes_one_request() {
        let pages = FakePages::new(0);
        let items = fetch_all_items(&pages).await.unwrap();
        assert_eq!(pages.requested(), [0]);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_stops_on_empty_page_before_total() {
        let mut pages = FakePages::new(120);
        // The playlist shrank after the first page was served.
        pages.total = 500;
        let items = fetch_all_items(&pages).await.unwrap();
        assert_eq!(pages.requested(), [0, 100, 120]);
        assert_eq!(items.len(), 120);
    }

    #[tokio::test]
    async fn test_failed_page_aborts_retrieval() {
        let mut pages = FakePages::new(300);
        pages.fail_at_offset = Some(100);
        let result = fetch_all_items(&pages).await;

        assert!(matches!(result, Err(CatalogError::UpstreamFetch(_))));
        assert_eq!(pages.requested(), [0, 100]);
    }

    #[tokio::test]
    async fn test_small_pages_preserve_order() {
        let pages = FakePages::new(7);
        let collected: Vec<Page<PlaylistItem>> =
            playlist_pages(&pages, 3).try_collect().await.unwrap();

        assert_eq!(pages.requested(), [0, 3, 6]);
        let sizes: Vec<usize> = collected.iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, [3, 3, 1]);

        let flattened: Vec<PlaylistItem> = collected.into_iter().flat_map(|p| p.items).collect();
        let expected: Vec<String> = (0..7).map(|i| format!("track-{i}")).collect();
        assert_eq!(titles(&flattened), expected);
    }

    #[tokio::test]
    async fn test_stream_is_restartable() {
        let pages = FakePages::new(5);
        let first: Vec<_> = playlist_pages(&pages, 2).try_collect().await.unwrap();
        let second: Vec<_> = playlist_pages(&pages, 2).try_collect().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(pages.requested(), [0, 2, 4, 0, 2, 4]);
    }
}
