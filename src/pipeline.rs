use anyhow::Result;
use scraper::Html;
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::enrich::Enricher;
use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::parser::listing::parse_listing;
use crate::parser::Rules;
use crate::pharmacy::{Coordinates, Pharmacy};

/// Listing fetch → parse → concurrent detail enrichment.
pub struct Pipeline<F> {
    fetcher: F,
    listing_url: Url,
    detail_url: Url,
    address_param: String,
    id_param: String,
    rules: Rules,
    max_concurrency: Option<usize>,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher,
            listing_url: parse_endpoint(&config.listing_url)?,
            detail_url: parse_endpoint(&config.detail_url)?,
            address_param: config.layout.address_param.clone(),
            id_param: config.layout.detail_id_param.clone(),
            rules: Rules::compile(&config.layout)?,
            max_concurrency: config.max_concurrency,
        })
    }

    pub fn listing_url_for(&self, address: &str) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut().append_pair(&self.address_param, address);
        url
    }

    /// Pharmacies on duty near `address`, in listing order.
    ///
    /// Only the listing fetch can fail; detail pages that can't be geocoded
    /// leave `lat`/`lon` at zero.
    pub async fn run(&self, address: &str) -> Result<Vec<Pharmacy>, ScrapeError> {
        let mut pharmacies = self.fetch_listing(address).await?;
        self.enricher().enrich_all(&mut pharmacies).await;
        Ok(pharmacies)
    }

    /// Listing only, without coordinates.
    pub async fn fetch_listing(&self, address: &str) -> Result<Vec<Pharmacy>, ScrapeError> {
        let url = self.listing_url_for(address);
        info!("Fetching listing: {}", url);

        let page = self
            .fetcher
            .get(url.as_str())
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;
        if !page.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: page.status,
            });
        }

        let pharmacies = self.parse_listing(&page.body);
        info!("Listing for '{}': {} pharmacies", address, pharmacies.len());
        Ok(pharmacies)
    }

    pub fn parse_listing(&self, html: &str) -> Vec<Pharmacy> {
        parse_listing(&Html::parse_document(html), &self.rules)
    }

    pub async fn lookup(&self, id: &str) -> Option<Coordinates> {
        self.enricher().enrich(id).await
    }

    fn enricher(&self) -> Enricher<'_, F> {
        Enricher {
            fetcher: &self.fetcher,
            detail_url: &self.detail_url,
            id_param: &self.id_param,
            rules: &self.rules,
            max_concurrency: self.max_concurrency,
        }
    }
}

fn parse_endpoint(url: &str) -> Result<Url, ScrapeError> {
    Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}
