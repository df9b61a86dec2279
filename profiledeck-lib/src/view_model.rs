use crate::error::{FetchError, ViewModelError};
use crate::profile::{Profile, ProfileId};
use crate::session::{Action, Effect, ScrollMetrics, Session, View};
use crate::source::UserSource;
use crate::store::{Restored, Store};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{event, instrument, Level};

type FetchResult = Result<Vec<Profile>, FetchError>;

/// Build the view model actor. The returned [`EventLoop`] has to be driven
/// with [`EventLoop::run`] (usually on a spawned task); the [`Handle`] is the
/// only way to talk to it.
pub fn new(
    session: Session,
    source: Arc<dyn UserSource>,
    store: Arc<dyn Store>,
) -> (Handle, EventLoop) {
    // Create command channel with buffer of 1 to process actions in order
    let (command_sender, command_receiver) = mpsc::channel(1);
    let (fetch_sender, fetch_receiver) = mpsc::channel(8);

    (
        Handle {
            sender: command_sender,
        },
        EventLoop {
            session,
            source,
            store,
            command_receiver,
            fetch_sender,
            fetch_receiver,
            pending_fetch: Default::default(),
        },
    )
}

#[derive(Clone, Debug)]
pub struct Handle {
    sender: mpsc::Sender<Command>,
}

impl Handle {
    /// Restore persisted state, start listening to scroll notifications and
    /// wait for the initial fetch to resolve.
    #[instrument(skip(self))]
    pub async fn startup(&self) -> Result<View, ViewModelError> {
        self.request(|sender| Command::Startup { sender }).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_initial(&self) -> Result<View, ViewModelError> {
        self.dispatch(Action::FetchInitial).await
    }

    pub async fn edit_search(&self, search: impl Into<String>) -> Result<View, ViewModelError> {
        self.dispatch(Action::EditSearch(search.into())).await
    }

    pub async fn edit_gender(&self, gender: impl Into<String>) -> Result<View, ViewModelError> {
        self.dispatch(Action::EditGender(gender.into())).await
    }

    #[instrument(skip(self))]
    pub async fn apply_filters(&self) -> Result<View, ViewModelError> {
        self.dispatch(Action::ApplyFilters).await
    }

    pub async fn load_more(&self) -> Result<View, ViewModelError> {
        self.dispatch(Action::LoadMore).await
    }

    pub async fn scroll(&self, distance_from_bottom: u32) -> Result<View, ViewModelError> {
        self.dispatch(Action::Scrolled(distance_from_bottom)).await
    }

    pub async fn scroll_to(&self, metrics: ScrollMetrics) -> Result<View, ViewModelError> {
        self.scroll(metrics.distance_from_bottom()).await
    }

    pub async fn select(&self, id: ProfileId) -> Result<View, ViewModelError> {
        self.dispatch(Action::Select(id)).await
    }

    pub async fn select_profile(&self, profile: Profile) -> Result<View, ViewModelError> {
        self.dispatch(Action::SelectProfile(profile)).await
    }

    /// Persist the selection, then forget it and stop reacting to scrolls.
    #[instrument(skip(self))]
    pub async fn teardown(&self) -> Result<View, ViewModelError> {
        self.dispatch(Action::Teardown).await
    }

    pub async fn view(&self) -> Result<View, ViewModelError> {
        self.request(|sender| Command::Snapshot { sender }).await
    }

    async fn dispatch(&self, action: Action) -> Result<View, ViewModelError> {
        self.request(|sender| Command::Dispatch { action, sender }).await
    }

    async fn request<F>(&self, command: F) -> Result<View, ViewModelError>
    where
        F: FnOnce(oneshot::Sender<View>) -> Command,
    {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(command(sender))
            .await
            .map_err(|_| ViewModelError::Stopped)?;
        receiver.await.map_err(|_| ViewModelError::Stopped)
    }
}

#[derive(Debug)]
enum Command {
    Startup {
        sender: oneshot::Sender<View>,
    },
    Dispatch {
        action: Action,
        sender: oneshot::Sender<View>,
    },
    Snapshot {
        sender: oneshot::Sender<View>,
    },
}

pub struct EventLoop {
    session: Session,
    source: Arc<dyn UserSource>,
    store: Arc<dyn Store>,
    command_receiver: mpsc::Receiver<Command>,
    fetch_sender: mpsc::Sender<FetchResult>,
    fetch_receiver: mpsc::Receiver<FetchResult>,
    pending_fetch: Vec<oneshot::Sender<View>>,
}

impl EventLoop {
    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Startup { sender } => {
                let restored = Restored::load(self.store.as_ref()).await;
                let effects = self.session.update(Action::Startup(restored));
                self.reply_after(effects, sender).await;
            }
            Command::Dispatch { action, sender } => {
                let effects = self.session.update(action);
                self.reply_after(effects, sender).await;
            }
            Command::Snapshot { sender } => {
                let _ = sender.send(self.session.view());
            }
        }
    }

    /// Answer right away, unless a fetch was started; then the caller hears
    /// back once the response has been applied.
    async fn reply_after(&mut self, effects: Vec<Effect>, sender: oneshot::Sender<View>) {
        let fetching = effects.iter().any(|e| matches!(e, Effect::Fetch { .. }));
        self.run_effects(effects).await;

        if fetching {
            self.pending_fetch.push(sender);
        } else {
            let _ = sender.send(self.session.view());
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch { results } => {
                    let source = self.source.clone();
                    let fetch_sender = self.fetch_sender.clone();
                    tokio::spawn(async move {
                        event!(Level::DEBUG, results, "Requesting profiles");
                        let result = source.fetch(results).await;
                        let _ = fetch_sender.send(result).await;
                    });
                }
                Effect::Persist { key, value } => {
                    if let Err(e) = self.store.set(key, &value).await {
                        tracing::error!("Could not persist {}: {:#}", key.as_str(), e);
                    }
                }
            }
        }
    }

    async fn handle_fetch(&mut self, result: FetchResult) {
        let effects = self.session.update(Action::FetchCompleted(result));
        self.run_effects(effects).await;

        let view = self.session.view();
        for sender in self.pending_fetch.drain(..) {
            let _ = sender.send(view.clone());
        }
    }

    /// Process commands and fetch completions until every [`Handle`] is gone.
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                command = self.command_receiver.recv() => match command {
                    Some(c) => self.handle_command(c).await,
                    None => return,
                },
                Some(result) = self.fetch_receiver.recv() => self.handle_fetch(result).await,
            }
        }
    }
}
