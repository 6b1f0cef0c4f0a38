use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Task, Theme};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod state;
mod ui;

use config::{Config, LOG_ENV};
use state::board::Board;
use state::link::{Category, Link, LinkCollection};
use state::modal::Field;
use state::profile::{FileProfileSource, Profile, ProfileSource};
use state::store::{KeyValueStore, LinkStore, MemoryStore, SqliteStore};

/// Main application state
struct LinkBoardApp {
    /// Links, rendered sections, modal, theme and search
    board: Board,
    /// Persistence for the link list
    store: LinkStore,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The profile signal resolved (or fell back)
    ProfileLoaded(Profile),
    /// Stored links (or the default seed) are available
    LinksLoaded(LinkCollection),
    ToggleTheme,
    SearchChanged(String),
    /// User clicked "Add Link"
    AddRequested,
    /// User clicked a card's edit button; carries the card's snapshot
    EditRequested(Link),
    /// User clicked a card's delete button
    DeleteRequested(String),
    DeleteConfirmed { id: String, confirmed: bool },
    FormFieldChanged(Field, String),
    CategorySelected(Category),
    Submit,
    Cancel,
    /// A save finished; re-render and optionally dismiss the modal
    Persisted { close_modal: bool },
    ToggleSection(Category),
    OpenLink(String),
}

impl Message {
    /// Messages that open the form or mutate the collection
    fn edits_links(&self) -> bool {
        matches!(
            self,
            Message::AddRequested
                | Message::EditRequested(_)
                | Message::DeleteRequested(_)
                | Message::DeleteConfirmed { .. }
                | Message::Submit
        )
    }
}

impl LinkBoardApp {
    /// Create a new instance of the application and start loading
    fn new(config: Config) -> (Self, Task<Message>) {
        let backend: Arc<dyn KeyValueStore> = match SqliteStore::open(config.db_path()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                // Keep running; edits last until the window closes
                tracing::error!(error = %e, "could not open link database, using in-memory storage");
                Arc::new(MemoryStore::new())
            }
        };
        let store = LinkStore::new(backend);
        let app = LinkBoardApp::with_store(store.clone());

        let profile_source: Arc<dyn ProfileSource> =
            Arc::new(FileProfileSource::new(config.profile_path.clone()));
        let timeout = config.profile_timeout();

        let startup = Task::batch([
            Task::perform(load_profile_async(profile_source, timeout), Message::ProfileLoaded),
            Task::perform(load_links_async(store.clone()), Message::LinksLoaded),
        ]);

        (app, startup)
    }

    fn with_store(store: LinkStore) -> Self {
        LinkBoardApp {
            board: Board::new(),
            store,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        // Editing before the stored links arrive would be overwritten by them
        if !self.board.loaded && message.edits_links() {
            tracing::debug!(?message, "ignored before links loaded");
            return Task::none();
        }

        match message {
            Message::ProfileLoaded(profile) => {
                self.board.profile = Some(profile);
                Task::none()
            }
            Message::LinksLoaded(links) => {
                self.board.set_links(links);
                Task::none()
            }
            Message::ToggleTheme => {
                self.board.theme.toggle();
                tracing::debug!(theme = self.board.theme.as_str(), "theme toggled");
                Task::none()
            }
            Message::SearchChanged(query) => {
                self.board.search(query);
                Task::none()
            }
            Message::AddRequested => {
                self.board.modal.show_add();
                Task::none()
            }
            Message::EditRequested(link) => {
                self.board.modal.show_edit(&link);
                Task::none()
            }
            Message::FormFieldChanged(field, value) => {
                if let Some(form) = self.board.modal.form_mut() {
                    form.set(field, value);
                }
                Task::none()
            }
            Message::CategorySelected(category) => {
                if let Some(form) = self.board.modal.form_mut() {
                    form.category = category.key().to_string();
                }
                Task::none()
            }
            Message::Cancel => {
                self.board.modal.hide();
                Task::none()
            }
            Message::Submit => match self.board.modal.submit() {
                Some(submission) => {
                    self.board.apply(submission);
                    self.persist(true)
                }
                None => Task::none(),
            },
            Message::DeleteRequested(id) => Task::perform(confirm_delete(), move |confirmed| {
                Message::DeleteConfirmed {
                    id: id.clone(),
                    confirmed,
                }
            }),
            Message::DeleteConfirmed { id, confirmed } => {
                if !confirmed {
                    return Task::none();
                }
                self.board.delete(&id);
                self.persist(false)
            }
            Message::Persisted { close_modal } => {
                self.board.rerender();
                if close_modal {
                    self.board.modal.hide();
                }
                Task::none()
            }
            Message::ToggleSection(category) => {
                self.board.rendered.toggle(category);
                Task::none()
            }
            Message::OpenLink(url) => {
                if let Err(e) = webbrowser::open(&url) {
                    tracing::warn!(%url, error = %e, "failed to open link");
                }
                Task::none()
            }
        }
    }

    /// Write the current collection, then report back with `Persisted`
    fn persist(&self, close_modal: bool) -> Task<Message> {
        let save = self.store.save(self.board.links.clone());
        Task::perform(save, move |()| Message::Persisted { close_modal })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = ui::header::view(
            self.board.profile.as_ref(),
            self.board.theme,
            &self.board.query,
            self.board.loaded,
        );

        let body: Element<Message> = if self.board.loaded {
            scrollable(ui::categories::view(&self.board.rendered))
                .height(Length::Fill)
                .into()
        } else {
            text("Loading links...").size(16).into()
        };

        let content = container(column![header, body].spacing(24).padding(24))
            .width(Length::Fill)
            .height(Length::Fill);

        ui::modal::overlay(content.into(), &self.board.modal)
    }

    /// Window theme follows the toggle
    fn theme(&self) -> Theme {
        match self.board.theme {
            state::board::ThemeState::Light => Theme::Light,
            state::board::ThemeState::Dark => Theme::Dark,
        }
    }
}

fn main() -> iced::Result {
    let config_path = Config::default_path();
    let loaded = Config::load_from(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_logging(&config);
    if let Err(e) = &loaded {
        tracing::error!(error = %e, "ignoring config file, using defaults");
    }
    tracing::info!(config = %config_path.display(), db = %config.db_path().display(), "starting LinkBoard");

    iced::application("LinkBoard", LinkBoardApp::update, LinkBoardApp::view)
        .theme(LinkBoardApp::theme)
        .centered()
        .run_with(move || LinkBoardApp::new(config))
}

/// `LINKBOARD_LOG` wins over the configured filter
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn load_profile_async(source: Arc<dyn ProfileSource>, timeout: Duration) -> Profile {
    state::profile::load_profile(source.as_ref(), timeout).await
}

async fn load_links_async(store: LinkStore) -> LinkCollection {
    store.load().await
}

/// Ask the user before deleting. Closing the dialog counts as "no".
async fn confirm_delete() -> bool {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Delete link")
        .set_description("Are you sure you want to delete this link?")
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    matches!(result, MessageDialogResult::Yes)
}
