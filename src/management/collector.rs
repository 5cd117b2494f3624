use std::{collections::HashSet, sync::Arc};

use rand::{Rng, seq::SliceRandom};

use crate::{
    Res,
    error::Error,
    spotify::{CatalogService, MAX_OFFSET, PAGE_SIZE},
    types::Track,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorOptions {
    /// Tracks requested per search call.
    pub page_size: usize,
    /// Offset ceiling per query.
    pub max_offset: usize,
    /// Skip tracks whose URI was already collected, across all queries.
    pub unique: bool,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_offset: MAX_OFFSET,
            unique: false,
        }
    }
}

/// Gathers tracks for a set of search queries, up to a target count, and
/// hands them back in random order.
///
/// Queries are paginated one after another. A query stops on an empty page,
/// on a short page, when the offset reaches the ceiling, or once the global
/// target is met. Without [`CollectorOptions::unique`] a track matching
/// several queries is collected once per match.
pub struct Collector<C> {
    catalog: Arc<C>,
    options: CollectorOptions,
}

impl<C: CatalogService> Collector<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_options(catalog, CollectorOptions::default())
    }

    pub fn with_options(catalog: Arc<C>, options: CollectorOptions) -> Self {
        let options = CollectorOptions {
            page_size: options.page_size.max(1),
            ..options
        };
        Self { catalog, options }
    }

    /// Even share of `target` per query, capped at the offset ceiling.
    pub fn per_query_budget(&self, queries: usize, target: usize) -> usize {
        if queries == 0 {
            return 0;
        }
        (target / queries).min(self.options.max_offset)
    }

    /// Collects up to `target` tracks and shuffles them with the thread rng.
    pub async fn collect(&self, queries: &[String], target: usize) -> Res<Vec<Track>> {
        let tracks = self.gather(queries, target).await?;
        Ok(shuffle_and_truncate(tracks, target, &mut rand::rng()))
    }

    /// Like [`Collector::collect`] with a caller supplied rng.
    pub async fn collect_with_rng<R>(
        &self,
        queries: &[String],
        target: usize,
        rng: &mut R,
    ) -> Res<Vec<Track>>
    where
        R: Rng + ?Sized,
    {
        let tracks = self.gather(queries, target).await?;
        Ok(shuffle_and_truncate(tracks, target, rng))
    }

    /// Fetches tracks in query order, numbering them as they arrive.
    ///
    /// # Arguments
    ///
    /// * `queries` - Search expressions, paginated one after another
    /// * `target` - Global track count to stop at
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Track>)` - At most `target` tracks, unshuffled
    /// - `Err(Error::InvalidInput)` - No queries or a zero target
    /// - `Err(Error)` - The first failing search; partial results are discarded
    pub async fn gather(&self, queries: &[String], target: usize) -> Res<Vec<Track>> {
        if queries.is_empty() {
            return Err(Error::InvalidInput("at least one query is required".to_string()));
        }
        if target == 0 {
            return Err(Error::InvalidInput("target count must be positive".to_string()));
        }

        let page_size = self.options.page_size;
        let mut tracks: Vec<Track> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for query in queries {
            let mut offset = 0;

            while tracks.len() < target && offset < self.options.max_offset {
                let page = self.catalog.search(query, page_size, offset).await?;
                if page.is_empty() {
                    break;
                }

                let fetched = page.len();
                for item in page {
                    if tracks.len() >= target {
                        break;
                    }
                    if self.options.unique && !seen.insert(item.uri.clone()) {
                        continue;
                    }
                    tracks.push(Track {
                        display_index: tracks.len() + 1,
                        title: item.title,
                        artist: item.artist,
                        uri: item.uri,
                    });
                }

                // a short page is the last one
                if fetched < page_size {
                    break;
                }
                offset += page_size;
            }

            if tracks.len() >= target {
                break;
            }
        }

        Ok(tracks)
    }
}

/// Uniformly permutes `tracks` and keeps at most `target` of them.
pub fn shuffle_and_truncate<R>(mut tracks: Vec<Track>, target: usize, rng: &mut R) -> Vec<Track>
where
    R: Rng + ?Sized,
{
    tracks.shuffle(rng);
    tracks.truncate(target);
    tracks
}
