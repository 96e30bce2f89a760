//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! a mirror run, including:
//! - Managing the frontier queue and visited set
//! - Coordinating fetching, classification and parsing
//! - Following same-origin links and saving pages inside the depth window
//! - Downloading each asset once per run
//! - Reporting per-URL outcomes

use crate::config::{Config, DepthWindow};
use crate::crawler::{
    build_http_client, classify_content, extract_assets, extract_links, fetch_and_store,
    fetch_url, rewrite_references, store_resource, ContentClass, Frontier, QueuedUrl,
    StoredResource,
};
use crate::document::{parse_html_with_content_type, parse_xml_with_content_type, Document};
use crate::output::{report_asset_saved, report_outcome, CrawlSummary, UrlOutcome};
use crate::state::PageState;
use crate::storage::{FsStorage, ProjectLayout, Storage};
use crate::url::{is_same_origin, normalize_url, parse_base_url};
use crate::{FailureKind, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns all state of one mirror run; nothing is shared or persisted.
pub struct Coordinator<S: Storage = FsStorage> {
    config: Config,
    base_url: Url,
    client: Client,
    layout: ProjectLayout,
    storage: S,
    frontier: Frontier,

    /// Outcome of every asset download attempted this run
    asset_cache: HashMap<Url, Option<StoredResource>>,

    summary: CrawlSummary,
}

impl Coordinator<FsStorage> {
    /// Creates a new coordinator writing to the local filesystem
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    /// * `base_url` - Seed URL; also the origin links must share to be followed
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - Unusable base URL or HTTP client setup failed
    pub fn new(config: Config, base_url: Url) -> Result<Self> {
        Self::with_storage(config, base_url, FsStorage::new())
    }
}

impl<S: Storage> Coordinator<S> {
    /// Creates a new coordinator writing through `storage`
    pub fn with_storage(config: Config, base_url: Url, storage: S) -> Result<Self> {
        let base_url = normalize_url(base_url.as_str())?;
        let layout = ProjectLayout::for_url(&base_url, &config.crawler.output_dir)?;
        let client = build_http_client(&config.user_agent, &config.fetcher)?;
        let frontier = Frontier::new(base_url.clone(), config.crawler.depth.max);

        Ok(Self {
            config,
            base_url,
            client,
            layout,
            storage,
            frontier,
            asset_cache: HashMap::new(),
            summary: CrawlSummary::new(),
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn window(&self) -> DepthWindow {
        self.config.crawler.depth
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Takes the next unvisited URL from the frontier
    /// 2. Fetches and classifies it
    /// 3. Stores opaque resources verbatim
    /// 4. Parses pages and queues their same-origin links
    /// 5. Saves pages inside the depth window with their assets
    ///
    /// A failed URL is reported and skipped; the run itself only ends when
    /// the frontier is exhausted.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        tracing::info!(
            "Mirroring {} into {} (depth {})",
            self.base_url,
            self.layout.root().display(),
            self.window()
        );

        while let Some(queued) = self.frontier.next_url() {
            tracing::debug!("Processing {} at depth {}", queued.url, queued.depth);

            let outcome = match self.process_url(&queued).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    match e.kind() {
                        FailureKind::Filesystem => {
                            tracing::error!("Could not write {}: {}", queued.url, e)
                        }
                        kind => tracing::error!("Failed {} ({}): {}", queued.url, kind, e),
                    }
                    UrlOutcome::new(queued.url.clone(), queued.depth, PageState::Failed)
                        .with_detail(e.to_string())
                }
            };

            report_outcome(&outcome);
            self.summary.record(outcome);
        }

        self.summary.finish();
        tracing::info!(
            "Mirror completed: {} URLs processed, {} visited, {} assets saved in {}s",
            self.summary.total_urls(),
            self.frontier.visited_count(),
            self.summary.assets_saved,
            self.summary.duration().num_seconds()
        );

        Ok(std::mem::take(&mut self.summary))
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the URL
    /// 2. Stores it verbatim if it is not a page
    /// 3. Parses the page and queues same-origin links one level deeper
    /// 4. Inside the depth window, saves assets, rewrites and writes the page
    async fn process_url(&mut self, queued: &QueuedUrl) -> Result<UrlOutcome> {
        let QueuedUrl { url, depth } = queued;

        // Already fetched as an embedded asset; pages among those still need analysis
        match self.asset_cache.get(url) {
            Some(Some(stored)) if !stored.class.is_page() => {
                return Ok(UrlOutcome::new(url.clone(), *depth, PageState::StoredAsAsset)
                    .with_local_path(stored.path.clone()));
            }
            Some(None) => {
                return Ok(UrlOutcome::new(url.clone(), *depth, PageState::Failed)
                    .with_detail("asset download failed earlier in this run"));
            }
            _ => {}
        }

        let resource = fetch_url(&self.client, url).await?;
        let class = classify_content(&resource.content_type, url);
        tracing::debug!(
            "Fetched {} (HTTP {}, {} bytes, {:?})",
            url,
            resource.status_code,
            resource.body.len(),
            class
        );

        if !class.is_page() {
            let path = store_resource(url, &resource, &self.layout, &mut self.storage)?;
            self.asset_cache.insert(
                url.clone(),
                Some(StoredResource {
                    path: path.clone(),
                    class,
                }),
            );
            return Ok(
                UrlOutcome::new(url.clone(), *depth, PageState::StoredAsAsset).with_local_path(path)
            );
        }

        let mut document = parse_document(class, &resource.body, &resource.content_type, url);

        // Links are followed whether or not the page itself is saved
        let mut queued_links = 0;
        for link in extract_links(&document, url) {
            if is_same_origin(&self.base_url, &link) && self.frontier.push(link, depth + 1) {
                queued_links += 1;
            }
        }
        tracing::debug!("Queued {} links from {}", queued_links, url);

        if !self.window().contains(*depth) {
            return Ok(UrlOutcome::new(url.clone(), *depth, PageState::CrawledOnly));
        }

        let asset_map = self.download_assets(&document, url).await;
        rewrite_references(
            &mut document,
            url,
            &self.layout,
            &self.storage,
            Some(&asset_map),
        );

        let page_path = self.layout.local_path(url, None);
        self.storage
            .write(&page_path, document.to_markup().as_bytes())?;

        Ok(UrlOutcome::new(url.clone(), *depth, PageState::AnalyzedAndStored)
            .with_local_path(page_path))
    }

    /// Downloads the assets of a page and maps each saved one to its path
    async fn download_assets(&mut self, document: &Document, page_url: &Url) -> HashMap<Url, PathBuf> {
        let mut assets: Vec<Url> = extract_assets(document, page_url).into_iter().collect();
        assets.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut asset_map = HashMap::new();
        for asset in assets {
            if !self.config.crawler.include_cross_origin_assets
                && !is_same_origin(page_url, &asset)
            {
                tracing::trace!("Skipping cross-origin asset {}", asset);
                continue;
            }

            if let Some(path) = self.download_asset(&asset).await {
                asset_map.insert(asset, path);
            }
        }
        asset_map
    }

    /// Downloads one asset unless this run already tried it
    async fn download_asset(&mut self, asset: &Url) -> Option<PathBuf> {
        if let Some(cached) = self.asset_cache.get(asset) {
            tracing::trace!("Asset cache hit for {}", asset);
            return cached.as_ref().map(|stored| stored.path.clone());
        }

        let stored = match fetch_and_store(&self.client, asset, &self.layout, &mut self.storage).await {
            Ok(stored) => {
                report_asset_saved(asset);
                self.summary.assets_saved += 1;
                Some(stored)
            }
            Err(e) => {
                tracing::warn!("Skipping asset {} ({}): {}", asset, e.kind(), e);
                self.summary.assets_failed += 1;
                None
            }
        };

        let path = stored.as_ref().map(|stored| stored.path.clone());
        self.asset_cache.insert(asset.clone(), stored);
        path
    }
}

/// Parses a page body according to its content class
///
/// XML that fails to parse strictly is reparsed with the lenient HTML parser.
fn parse_document(class: ContentClass, body: &[u8], content_type: &str, url: &Url) -> Document {
    let content_type = Some(content_type).filter(|value| !value.is_empty());
    match class {
        ContentClass::Xml => parse_xml_with_content_type(body, content_type).unwrap_or_else(|e| {
            tracing::debug!("XML parse failed for {} ({}), using HTML parser", url, e);
            parse_html_with_content_type(body, content_type)
        }),
        ContentClass::Markup | ContentClass::Opaque => parse_html_with_content_type(body, content_type),
    }
}

/// Runs a complete mirror operation
///
/// # Arguments
///
/// * `config` - The mirror configuration
/// * `base_url` - Seed URL, must start with `http://` or `https://`
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished; individual URLs may still have failed
/// * `Err(MirrorError)` - Crawl could not start
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::Config;
/// use site_mirror::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(Config::default(), "https://example.com/").await?;
/// println!("{} URLs processed", summary.total_urls());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, base_url: &str) -> Result<CrawlSummary> {
    let base_url = parse_base_url(base_url)?;
    let mut coordinator = Coordinator::new(config, base_url)?;
    coordinator.run().await
}

/// Local project directory a crawl of `base_url` would write into
pub fn project_root(config: &Config, base_url: &Url) -> Result<PathBuf> {
    let layout = ProjectLayout::for_url(base_url, &config.crawler.output_dir)?;
    Ok(layout.root().to_path_buf())
}
