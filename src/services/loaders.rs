// src/services/loaders.rs

//! Route, direction, and stop page loaders.

use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    DIRECTION_PLACEHOLDER, Direction, ROUTE_PLACEHOLDER, Route, SourceConfig, Stop,
    compile_id_pattern,
};
use crate::services::extractor::{Link, LinkExtractor, UNRECOGNIZED_URL};
use crate::services::fetcher::PageFetcher;
use crate::utils::{fill_template, page_url};

/// Loads the three tiers of listing pages from one transit site.
pub struct TransitLoader<F> {
    fetcher: F,
    extractor: LinkExtractor,
    base: Url,
    routes_path: String,
    directions_path: String,
    stops_path: String,
    route_pattern: Regex,
    direction_pattern: Regex,
    stop_pattern: Regex,
}

impl<F: PageFetcher> TransitLoader<F> {
    pub fn new(fetcher: F, source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: LinkExtractor::new(&source.link_selector)?,
            base: source.base()?,
            routes_path: source.routes_path.clone(),
            directions_path: source.directions_path.clone(),
            stops_path: source.stops_path.clone(),
            route_pattern: compile_id_pattern(&source.route_pattern)?,
            direction_pattern: compile_id_pattern(&source.direction_pattern)?,
            stop_pattern: compile_id_pattern(&source.stop_pattern)?,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn routes_url(&self) -> Result<String> {
        page_url(&self.base, &self.routes_path)
    }

    pub fn directions_url(&self, route_number: &str) -> Result<String> {
        let path = fill_template(&self.directions_path, &[(ROUTE_PLACEHOLDER, route_number)]);
        page_url(&self.base, &path)
    }

    pub fn stops_url(&self, route_number: &str, direction_number: u32) -> Result<String> {
        let direction = direction_number.to_string();
        let path = fill_template(
            &self.stops_path,
            &[
                (ROUTE_PLACEHOLDER, route_number),
                (DIRECTION_PLACEHOLDER, direction.as_str()),
            ],
        );
        page_url(&self.base, &path)
    }

    /// Load every route. The number is kept as published, leading zeros included.
    pub async fn load_routes(&self) -> Result<Vec<Route>> {
        let url = self.routes_url()?;
        let links = self.load_links(&url, &self.route_pattern).await?;
        Ok(links
            .into_iter()
            .map(|link| Route::new(link.id, link.label))
            .collect())
    }

    /// Load the directions served by one route.
    pub async fn load_directions(&self, route_number: &str) -> Result<Vec<Direction>> {
        let url = self.directions_url(route_number)?;
        let links = self.load_links(&url, &self.direction_pattern).await?;
        links
            .into_iter()
            .map(|link| -> Result<Direction> {
                Ok(Direction::new(parse_number(&link)?, link.label))
            })
            .collect()
    }

    /// Load the stops of one route in one direction.
    pub async fn load_stops(&self, route_number: &str, direction_number: u32) -> Result<Vec<Stop>> {
        let url = self.stops_url(route_number, direction_number)?;
        let links = self.load_links(&url, &self.stop_pattern).await?;
        links
            .into_iter()
            .map(|link| -> Result<Stop> {
                Ok(Stop::new(parse_number(&link)?, link.label))
            })
            .collect()
    }

    async fn load_links(&self, url: &str, pattern: &Regex) -> Result<Vec<Link>> {
        let html = self.fetcher.fetch(url).await?;
        let links = self.extractor.extract_html(&html, pattern)?;
        log::debug!("{} links on {}", links.len(), url);
        Ok(links)
    }
}

fn parse_number(link: &Link) -> Result<u32> {
    link.id
        .parse()
        .map_err(|_| AppError::format(UNRECOGNIZED_URL))
}
