use crate::config::Config;
use crate::error::ViewModelError;
use crate::profile::Profile;
use crate::session::{Session, View};
use crate::source::UserSource;
use crate::store::{MemoryStore, SledStore, Store};
use crate::view_model::Handle;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub mod config;
pub mod error;
pub mod profile;
pub mod session;
pub mod source;
pub mod store;
pub mod view_model;

/// Blocking front door to the view model, for callers without a runtime of
/// their own. The actor runs on a runtime owned by the client.
pub struct Client {
    runtime: Runtime,
    handle: Handle,
}

impl Client {
    /// Persist to a sled database at `p`.
    pub fn new<P: AsRef<Path>>(p: P, config: &Config) -> anyhow::Result<Self> {
        let store = SledStore::open(p)?;
        Self::with_parts(Arc::new(config.source()?), Arc::new(store), config)
    }

    /// Keep everything in memory; nothing survives the process.
    pub fn ephemeral(config: &Config) -> anyhow::Result<Self> {
        Self::with_parts(
            Arc::new(config.source()?),
            Arc::new(MemoryStore::new()),
            config,
        )
    }

    pub fn with_parts(
        source: Arc<dyn UserSource>,
        store: Arc<dyn Store>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let session = Session::new(config.settings());
        let (handle, mut event_loop) = view_model::new(session, source, store);

        // Kick off the event loop on the client's runtime
        runtime.spawn(async move { event_loop.run().await });

        Ok(Self { runtime, handle })
    }

    pub fn startup(&self) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.startup())
    }

    pub fn fetch_initial(&self) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.fetch_initial())
    }

    pub fn edit_search(&self, search: &str) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.edit_search(search))
    }

    pub fn edit_gender(&self, gender: &str) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.edit_gender(gender))
    }

    pub fn apply_filters(&self) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.apply_filters())
    }

    pub fn scroll(&self, distance_from_bottom: u32) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.scroll(distance_from_bottom))
    }

    /// Select the profile the viewer picked, even if a later fetch has
    /// already replaced the pool it came from.
    pub fn select(&self, profile: Profile) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.select_profile(profile))
    }

    pub fn view(&self) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.view())
    }

    pub fn teardown(&self) -> Result<View, ViewModelError> {
        self.runtime.block_on(self.handle.teardown())
    }
}
