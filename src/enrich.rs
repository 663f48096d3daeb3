use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::debug;
use url::Url;

use crate::fetch::Fetcher;
use crate::parser::detail::parse_coordinates;
use crate::parser::Rules;
use crate::pharmacy::{Coordinates, Pharmacy};

/// Geocodes pharmacies from their detail pages.
pub struct Enricher<'a, F: ?Sized> {
    pub fetcher: &'a F,
    pub detail_url: &'a Url,
    pub id_param: &'a str,
    pub rules: &'a Rules,
    pub max_concurrency: Option<usize>,
}

impl<F: Fetcher + ?Sized> Enricher<'_, F> {
    pub fn detail_url_for(&self, id: &str) -> Url {
        let mut url = self.detail_url.clone();
        url.query_pairs_mut().append_pair(self.id_param, id);
        url
    }

    /// Coordinates for one detail page, or `None` on any failure. Never errors.
    pub async fn enrich(&self, id: &str) -> Option<Coordinates> {
        let url = self.detail_url_for(id);
        let page = match self.fetcher.get(url.as_str()).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => {
                debug!("Detail page {} returned HTTP {}", url, page.status);
                return None;
            }
            Err(e) => {
                debug!("Detail page {} failed: {:#}", url, e);
                return None;
            }
        };

        let document = Html::parse_document(&page.body);
        let coords = parse_coordinates(&document, &url, self.rules);
        if coords.is_none() {
            debug!("No map link on {}", url);
        }
        coords
    }

    /// Fetch every detail page concurrently and write the coordinates in place.
    ///
    /// Each future owns the `&mut` to its own slot, so order and identity are
    /// untouched. Returns once every future has finished.
    pub async fn enrich_all(&self, pharmacies: &mut [Pharmacy]) {
        let total = pharmacies.len();
        stream::iter(pharmacies.iter_mut())
            .for_each_concurrent(self.max_concurrency, |pharmacy| async move {
                if let Some(coords) = self.enrich(&pharmacy.id).await {
                    pharmacy.set_coordinates(coords);
                }
            })
            .await;
        debug!("Enrichment finished for {} pharmacies", total);
    }
}
