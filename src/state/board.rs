/// The board: rendered category snapshot, search, theme and modal
///
/// `render` rebuilds the whole snapshot from the link collection. Search
/// works on that snapshot's visible text, not on the links themselves.

use super::link::{Category, Link, LinkCollection};
use super::modal::{Modal, Submission};
use super::profile::Profile;

/// Window theme, process lifetime only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeState {
    #[default]
    Light,
    Dark,
}

impl ThemeState {
    pub fn toggle(&mut self) {
        *self = match self {
            ThemeState::Light => ThemeState::Dark,
            ThemeState::Dark => ThemeState::Light,
        };
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeState::Light => "light",
            ThemeState::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chevron {
    Down,
    Right,
}

/// One rendered bookmark card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Snapshot of the link at render time, handed to the edit action
    pub link: Link,
    /// Icon badge derived from the glyph class. It stands in for the icon
    /// glyph, so it is not part of the searchable text.
    pub badge: String,
    pub visible: bool,
}

impl Card {
    fn new(link: &Link) -> Self {
        Self {
            badge: icon_badge(link.display_icon()),
            link: link.clone(),
            visible: true,
        }
    }

    /// The card's text content: title and description
    pub fn visible_text(&self) -> String {
        format!("{}\n{}", self.link.title, self.link.description)
    }
}

/// A collapsible category section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    pub expanded: bool,
    pub cards: Vec<Card>,
}

impl Section {
    pub fn title(&self) -> &'static str {
        self.category.title()
    }

    pub fn chevron(&self) -> Chevron {
        if self.expanded {
            Chevron::Down
        } else {
            Chevron::Right
        }
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.visible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedBoard {
    pub sections: Vec<Section>,
}

impl RenderedBoard {
    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    /// Flip a section between expanded and collapsed
    pub fn toggle(&mut self, category: Category) {
        if let Some(section) = self.sections.iter_mut().find(|s| s.category == category) {
            section.expanded = !section.expanded;
        }
    }

    /// Show cards whose visible text contains `query` (case-insensitive), hide the rest.
    /// Sections stay in place even when all their cards are hidden.
    pub fn filter(&mut self, query: &str) {
        let query = query.to_lowercase();
        for card in self.sections.iter_mut().flat_map(|s| s.cards.iter_mut()) {
            card.visible = card.visible_text().to_lowercase().contains(&query);
        }
    }
}

/// Build sections in category order, skipping empty categories.
/// Links with unknown categories match no section.
pub fn render(links: &LinkCollection) -> RenderedBoard {
    let sections = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let cards: Vec<Card> = links.in_category(category).map(Card::new).collect();
            if cards.is_empty() {
                return None;
            }
            Some(Section {
                category,
                expanded: true,
                cards,
            })
        })
        .collect();

    RenderedBoard { sections }
}

/// "fab fa-google" → "google"
fn icon_badge(icon: &str) -> String {
    icon.split_whitespace()
        .filter_map(|class| class.strip_prefix("fa-"))
        .last()
        .unwrap_or(icon)
        .to_string()
}

/// Application state owned by the top-level controller
#[derive(Debug, Default)]
pub struct Board {
    pub links: LinkCollection,
    pub rendered: RenderedBoard,
    pub profile: Option<Profile>,
    pub modal: Modal,
    pub theme: ThemeState,
    pub query: String,
    /// False until the stored links have been loaded
    pub loaded: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the loaded collection and render it
    pub fn set_links(&mut self, links: LinkCollection) {
        self.links = links;
        self.loaded = true;
        self.rerender();
    }

    /// Discard and rebuild the rendered snapshot, then re-apply the search
    pub fn rerender(&mut self) {
        self.rendered = render(&self.links);
        if !self.query.is_empty() {
            self.rendered.filter(&self.query);
        }
    }

    pub fn search(&mut self, query: String) {
        self.rendered.filter(&query);
        self.query = query;
    }

    /// Apply a submitted form to the collection.
    /// Returns true if the collection changed. Nothing changes before the
    /// stored links are loaded, since loading replaces the collection.
    pub fn apply(&mut self, submission: Submission) -> bool {
        if !self.loaded {
            tracing::warn!("links not loaded yet, ignoring submitted form");
            return false;
        }
        match submission {
            Submission::Create(fields) => {
                let link = self.links.create(fields);
                tracing::info!(id = %link.id, title = %link.title, "link created");
                true
            }
            Submission::Update { id, fields } => {
                let updated = self.links.update(&id, fields);
                if updated {
                    tracing::info!(%id, "link updated");
                } else {
                    tracing::warn!(%id, "edited link no longer exists");
                }
                updated
            }
        }
    }

    /// Remove a link after the user confirmed. Returns how many were removed.
    pub fn delete(&mut self, id: &str) -> usize {
        if !self.loaded {
            tracing::warn!(%id, "links not loaded yet, ignoring delete");
            return 0;
        }
        let removed = self.links.delete(id);
        tracing::info!(%id, removed, "link deleted");
        removed
    }
}
