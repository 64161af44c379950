use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use worknest_activity_log::EventCategory;
use worknest_domain::{InstallResult, ListQuery, Listing, ListingStatus, Page};
use worknest_http::HttpClientTrait;
use worknest_query::{Debouncer, Mutation, QueryKey};

use super::HookContext;
use crate::error::Result;
use crate::repository::MarketplaceRepository;

/// Marketplace browser: a debounced search term drives a cached listing query
pub struct MarketplaceSearch {
    repo: MarketplaceRepository,
    ctx: HookContext,
    term: Debouncer<String>,
}

impl MarketplaceSearch {
    /// Must be called inside a tokio runtime
    pub fn new(http: Arc<dyn HttpClientTrait>, ctx: HookContext, debounce: Duration) -> Self {
        Self {
            repo: MarketplaceRepository::new(http),
            ctx,
            term: Debouncer::new(String::new(), debounce),
        }
    }

    pub fn query_key(term: &str) -> QueryKey {
        QueryKey::from(["marketplace", "listings"]).with(term.trim().to_lowercase())
    }

    /// Feed keystrokes; the search only changes after the debounce delay
    pub fn set_term(&self, term: impl Into<String>) {
        self.term.set(term.into());
    }

    /// The debounced term
    pub fn term(&self) -> String {
        self.term.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.term.subscribe()
    }

    /// Listed entries matching the current debounced term
    pub async fn results(&self) -> Result<Page<Listing>> {
        let term = self.term();
        let mut query = ListQuery::new().with_status(ListingStatus::Listed.as_str());
        if !term.trim().is_empty() {
            query = query.with_search(term.trim());
        }

        let page = self
            .ctx
            .query
            .fetch(&Self::query_key(&term), || self.repo.listings.list(&query))
            .await?;
        Ok(page)
    }

    /// Install a listing; refreshes listings and the workspace's tasks
    pub async fn install(&self, listing_id: &str, workspace_id: &str) -> Result<InstallResult> {
        let mutation = Mutation::new(Arc::clone(&self.ctx.query))
            .invalidates(QueryKey::from(["marketplace"]))
            .invalidates(QueryKey::from(["tasks"]).with(workspace_id));

        let result = mutation
            .run(self.repo.install(listing_id, workspace_id))
            .await;
        self.ctx
            .settle(
                EventCategory::Marketplace,
                "listing_installed",
                workspace_id,
                "Marketplace",
                "Listing installed",
                &result,
            )
            .await;
        Ok(result?)
    }
}
