//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! All three entity kinds are composed here once, at startup. Every port
//! has an in-memory default, so `AppBuilder::new().build()` gives a working
//! app; tests swap in their own stores or ledger.
//!
//! # Fail-fast 設計
//! - build() で config を検証し、不正なら BuildError を返す

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::app::chaincode::ChaincodeService;
use crate::app::list_view::ListView;
use crate::app::resource::{EntityResource, ResourceError};
use crate::config::{BlogchainConfig, ConfigError};
use crate::domain::{Blog, BlogEntry, Entity, Tag};
use crate::impls::{InMemoryEntityStore, InMemoryLedger};
use crate::observability::CollectionCounts;
use crate::ports::{Clock, EntityStore, IdGenerator, Ledger, SystemClock, UlidGenerator};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct AppBuilder {
    config: BlogchainConfig,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    ledger: Option<Arc<dyn Ledger>>,
    blogs: Option<Arc<dyn EntityStore<Blog>>>,
    blog_entries: Option<Arc<dyn EntityStore<BlogEntry>>>,
    tags: Option<Arc<dyn EntityStore<Tag>>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: BlogchainConfig::default(),
            clock: None,
            ids: None,
            ledger: None,
            blogs: None,
            blog_entries: None,
            tags: None,
        }
    }

    pub fn config(mut self, config: BlogchainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Ledger used for mirroring (ignored when `ledger.enabled = false`).
    pub fn ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn blog_store(mut self, store: Arc<dyn EntityStore<Blog>>) -> Self {
        self.blogs = Some(store);
        self
    }

    pub fn blog_entry_store(mut self, store: Arc<dyn EntityStore<BlogEntry>>) -> Self {
        self.blog_entries = Some(store);
        self
    }

    pub fn tag_store(mut self, store: Arc<dyn EntityStore<Tag>>) -> Self {
        self.tags = Some(store);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(clock.clone())),
        };

        let ledger: Option<Arc<dyn Ledger>> = if self.config.ledger.enabled {
            Some(self.ledger.unwrap_or_else(|| {
                Arc::new(InMemoryLedger::new(
                    self.config.ledger.channel_name.clone(),
                    ids.clone(),
                    clock.clone(),
                ))
            }))
        } else {
            None
        };
        let mirror = ledger.clone().map(ChaincodeService::new);
        let app_name = self.config.app_name.as_str();

        let blogs = resource(self.blogs, &ids, mirror.clone(), app_name);
        let blog_entries = resource(self.blog_entries, &ids, mirror.clone(), app_name);
        let tags = resource(self.tags, &ids, mirror.clone(), app_name);

        let chaincode = if self.config.is_dev() { mirror } else { None };

        info!(
            app = %self.config.app_name,
            profile = ?self.config.profile,
            ledger = self.config.ledger.enabled,
            channel = %self.config.ledger.channel_name,
            "blogchain app built"
        );

        Ok(App {
            config: self.config,
            blogs,
            blog_entries,
            tags,
            chaincode,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn resource<E: Entity>(
    store: Option<Arc<dyn EntityStore<E>>>,
    ids: &Arc<dyn IdGenerator>,
    mirror: Option<ChaincodeService>,
    app_name: &str,
) -> Arc<EntityResource<E>> {
    let store = store.unwrap_or_else(|| Arc::new(InMemoryEntityStore::<E>::new(ids.clone())));
    Arc::new(EntityResource::new(store, mirror, app_name))
}

/// The composed application: one resource per entity kind.
pub struct App {
    config: BlogchainConfig,
    blogs: Arc<EntityResource<Blog>>,
    blog_entries: Arc<EntityResource<BlogEntry>>,
    tags: Arc<EntityResource<Tag>>,
    chaincode: Option<ChaincodeService>,
}

impl App {
    pub fn config(&self) -> &BlogchainConfig {
        &self.config
    }

    pub fn blogs(&self) -> &Arc<EntityResource<Blog>> {
        &self.blogs
    }

    pub fn blog_entries(&self) -> &Arc<EntityResource<BlogEntry>> {
        &self.blog_entries
    }

    pub fn tags(&self) -> &Arc<EntityResource<Tag>> {
        &self.tags
    }

    pub fn blog_list(&self) -> ListView<Blog> {
        ListView::new(self.blogs.clone())
    }

    pub fn blog_entry_list(&self) -> ListView<BlogEntry> {
        ListView::new(self.blog_entries.clone())
    }

    pub fn tag_list(&self) -> ListView<Tag> {
        ListView::new(self.tags.clone())
    }

    /// Raw ledger access, dev profile only.
    pub fn chaincode(&self) -> Option<&ChaincodeService> {
        self.chaincode.as_ref()
    }

    pub async fn counts(&self) -> Result<CollectionCounts, ResourceError> {
        Ok(CollectionCounts {
            blogs: self.blogs.count().await?,
            blog_entries: self.blog_entries.count().await?,
            tags: self.tags.count().await?,
        })
    }
}
