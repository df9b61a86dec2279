//! Pure view-model state and its update function.
//!
//! Nothing in here performs I/O. [`Session::update`] takes an [`Action`],
//! mutates the owned state, and hands back the [`Effect`]s the caller has to
//! carry out (remote fetches and store writes).

use crate::error::FetchError;
use crate::profile::{Profile, ProfileId};
use crate::store::{encode_selected, Restored, StoreKey};
use serde::Serialize;

pub const RESULTS_PER_PAGE: usize = 25;
pub const SCROLL_THRESHOLD: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub results_per_page: usize,
    pub scroll_threshold: u32,
    /// Pages worth of profiles requested by the initial fetch.
    pub pool_pages: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_per_page: RESULTS_PER_PAGE,
            scroll_threshold: SCROLL_THRESHOLD,
            pool_pages: 1,
        }
    }
}

impl Settings {
    pub fn batch_size(&self) -> usize {
        self.results_per_page * self.pool_pages.max(1)
    }
}

#[derive(Debug)]
pub enum Action {
    Startup(Restored),
    FetchInitial,
    FetchCompleted(Result<Vec<Profile>, FetchError>),
    EditSearch(String),
    EditGender(String),
    ApplyFilters,
    LoadMore,
    Scrolled(u32),
    Select(ProfileId),
    SelectProfile(Profile),
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { results: usize },
    Persist { key: StoreKey, value: String },
}

/// Browser-style scroll position, reduced to a distance from the bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_top: u32,
    pub viewport_height: u32,
    pub content_height: u32,
}

impl ScrollMetrics {
    pub fn distance_from_bottom(&self) -> u32 {
        self.content_height
            .saturating_sub(self.scroll_top)
            .saturating_sub(self.viewport_height)
    }
}

/// Profiles matching `search` and `gender`, in input order.
pub fn filtered<'a>(profiles: &'a [Profile], search: &str, gender: &str) -> Vec<&'a Profile> {
    profiles
        .iter()
        .filter(|p| p.matches(search, gender))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    settings: Settings,
    search: String,
    gender_filter: String,
    draft_search: String,
    draft_gender: String,
    profiles: Vec<Profile>,
    displayed: Vec<Profile>,
    page: usize,
    loading: bool,
    selected: Option<Profile>,
    subscribed: bool,
    last_error: Option<String>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            page: 1,
            ..Default::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn gender_filter(&self) -> &str {
        &self.gender_filter
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn displayed(&self) -> &[Profile] {
        &self.displayed
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<&Profile> {
        self.selected.as_ref()
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn filtered(&self) -> Vec<&Profile> {
        filtered(&self.profiles, &self.search, &self.gender_filter)
    }

    pub fn has_more(&self) -> bool {
        self.displayed.len() < self.filtered().len()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Startup(restored) => {
                self.search = restored.search;
                self.gender_filter = restored.filter_gender;
                self.draft_search = self.search.clone();
                self.draft_gender = self.gender_filter.clone();
                self.selected = restored.selected;
                self.subscribed = true;
                self.fetch_initial()
            }
            Action::FetchInitial => self.fetch_initial(),
            Action::FetchCompleted(Ok(profiles)) => {
                self.profiles = profiles;
                self.displayed = self.first_page();
                self.page = 1;
                self.last_error = None;
                vec![]
            }
            Action::FetchCompleted(Err(e)) => {
                tracing::error!("Fetching profiles failed: {:#}", anyhow::Error::from(e));
                self.last_error = Some("Could not load profiles".to_string());
                vec![]
            }
            Action::EditSearch(search) => {
                self.draft_search = search;
                vec![]
            }
            Action::EditGender(gender) => {
                self.draft_gender = gender;
                vec![]
            }
            Action::ApplyFilters => self.apply_filters(),
            Action::LoadMore => {
                self.load_more();
                vec![]
            }
            Action::Scrolled(distance) => {
                if self.subscribed && distance <= self.settings.scroll_threshold && self.has_more()
                {
                    self.load_more();
                }
                vec![]
            }
            Action::Select(id) => {
                match self.profiles.iter().find(|p| p.id() == id) {
                    Some(profile) => self.selected = Some(profile.clone()),
                    None => tracing::debug!("Ignoring selection of unknown profile {}", id),
                }
                vec![]
            }
            Action::SelectProfile(profile) => {
                self.selected = Some(profile);
                vec![]
            }
            Action::Teardown => {
                self.subscribed = false;
                let value = encode_selected(self.selected.as_ref());
                self.selected = None;
                vec![Effect::Persist {
                    key: StoreKey::SelectedUser,
                    value,
                }]
            }
        }
    }

    fn fetch_initial(&self) -> Vec<Effect> {
        vec![Effect::Fetch {
            results: self.settings.batch_size(),
        }]
    }

    fn apply_filters(&mut self) -> Vec<Effect> {
        self.search = self.draft_search.clone();
        self.gender_filter = self.draft_gender.clone();
        self.displayed = self.first_page();
        self.page = 1;

        vec![
            Effect::Persist {
                key: StoreKey::Search,
                value: self.search.clone(),
            },
            Effect::Persist {
                key: StoreKey::FilterGender,
                value: self.gender_filter.clone(),
            },
        ]
    }

    /// Reveal the next page of the already fetched, filtered pool.
    fn load_more(&mut self) {
        if self.loading || !self.has_more() {
            return;
        }

        self.loading = true;

        let per_page = self.settings.results_per_page;
        let start = self.page * per_page;
        let next: Vec<Profile> = self
            .filtered()
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        if !next.is_empty() {
            self.displayed.extend(next);
            self.page += 1;
        }

        self.loading = false;
    }

    fn first_page(&self) -> Vec<Profile> {
        self.filtered()
            .into_iter()
            .take(self.settings.results_per_page)
            .cloned()
            .collect()
    }

    pub fn view(&self) -> View {
        View {
            search: self.search.clone(),
            gender_filter: self.gender_filter.clone(),
            draft_search: self.draft_search.clone(),
            draft_gender: self.draft_gender.clone(),
            page: self.page,
            loading: self.loading,
            has_more: self.has_more(),
            total_fetched: self.profiles.len(),
            total_filtered: self.filtered().len(),
            displayed: self.displayed.clone(),
            selected: self.selected.clone(),
            error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
impl Session {
    pub(crate) fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

/// Snapshot handed to rendering surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub search: String,
    pub gender_filter: String,
    pub draft_search: String,
    pub draft_gender: String,
    pub page: usize,
    pub loading: bool,
    pub has_more: bool,
    pub total_fetched: usize,
    pub total_filtered: usize,
    pub displayed: Vec<Profile>,
    pub selected: Option<Profile>,
    pub error: Option<String>,
}
