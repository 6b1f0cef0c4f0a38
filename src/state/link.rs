/// Link data model
///
/// This module holds the bookmark records and the ordered collection
/// that owns them. The collection is serialized to JSON for storage.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Glyph class used when a link has no icon of its own
pub const DEFAULT_ICON: &str = "fas fa-link";

/// The fixed display buckets, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FrequentlyUsed,
    Work,
    Entertainment,
    Social,
    Tools,
}

impl Category {
    /// All categories in the order they are rendered
    pub const ALL: [Category; 5] = [
        Category::FrequentlyUsed,
        Category::Work,
        Category::Entertainment,
        Category::Social,
        Category::Tools,
    ];

    /// Storage key (e.g., "frequently-used")
    pub fn key(self) -> &'static str {
        match self {
            Category::FrequentlyUsed => "frequently-used",
            Category::Work => "work",
            Category::Entertainment => "entertainment",
            Category::Social => "social",
            Category::Tools => "tools",
        }
    }

    /// Human-readable section title
    pub fn title(self) -> &'static str {
        match self {
            Category::FrequentlyUsed => "Frequently Used",
            Category::Work => "Work",
            Category::Entertainment => "Entertainment",
            Category::Social => "Social",
            Category::Tools => "Tools",
        }
    }

    /// Look up a category by storage key. Unknown keys yield None.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// A single bookmark
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Unique id (milliseconds since the epoch at creation time)
    pub id: String,
    pub title: String,
    /// Target address, opened in the system browser
    pub url: String,
    /// Glyph class; may be empty
    pub icon: String,
    pub description: String,
    /// Category key. Values outside `Category::ALL` are kept but never shown.
    pub category: String,
}

/// The user-editable part of a link (everything except the id)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkFields {
    pub title: String,
    pub url: String,
    pub icon: String,
    pub description: String,
    pub category: String,
}

impl Link {
    fn from_fields(id: String, fields: LinkFields) -> Self {
        Self {
            id,
            title: fields.title,
            url: fields.url,
            icon: fields.icon,
            description: fields.description,
            category: fields.category,
        }
    }

    /// Copy the editable fields out of this link
    pub fn fields(&self) -> LinkFields {
        LinkFields {
            title: self.title.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }

    /// Icon to display, falling back to the default glyph
    pub fn display_icon(&self) -> &str {
        if self.icon.is_empty() {
            DEFAULT_ICON
        } else {
            &self.icon
        }
    }
}

/// Ordered list of links. Insertion order is display order within a category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct LinkCollection {
    links: Vec<Link>,
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in seed used when nothing (readable) is stored
    pub fn default_seed() -> Self {
        Self {
            links: vec![Link {
                id: "1".to_string(),
                title: "Google".to_string(),
                url: "https://google.com".to_string(),
                icon: "fab fa-google".to_string(),
                description: "Search Engine".to_string(),
                category: Category::FrequentlyUsed.key().to_string(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Links belonging to `category`, in collection order
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.category == category.key())
    }

    /// Append a new link with a fresh id and return it
    pub fn create(&mut self, fields: LinkFields) -> Link {
        let id = self.fresh_id(Utc::now().timestamp_millis());
        let link = Link::from_fields(id, fields);
        self.links.push(link.clone());
        link
    }

    /// Replace the link with `id` in place. Returns false if no such link exists.
    pub fn update(&mut self, id: &str, fields: LinkFields) -> bool {
        match self.links.iter().position(|l| l.id == id) {
            Some(index) => {
                self.links[index] = Link::from_fields(id.to_string(), fields);
                true
            }
            None => false,
        }
    }

    /// Remove every link with `id`, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn delete(&mut self, id: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        before - self.links.len()
    }

    /// Decimal millisecond timestamp, bumped until it is not already taken
    fn fresh_id(&self, mut millis: i64) -> String {
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string (from storage)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Link>> for LinkCollection {
    fn from(links: Vec<Link>) -> Self {
        Self { links }
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

#[cfg(test)]
pub(crate) fn link(id: &str, title: &str, category: &str) -> Link {
    Link {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://{}.example", title.to_lowercase()),
        icon: String::new(),
        description: format!("{} description", title),
        category: category.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, category: &str) -> LinkFields {
        LinkFields {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            icon: "fas fa-star".to_string(),
            description: "desc".to_string(),
            category: category.to_string(),
        }
    }

    fn sample() -> LinkCollection {
        LinkCollection::from(vec![
            link("a", "Alpha", "work"),
            link("b", "Beta", "social"),
            link("c", "Gamma", "work"),
        ])
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
        assert_eq!(Category::from_key("news"), None);
    }

    #[test]
    fn test_create_appends_with_fresh_id() {
        let mut links = sample();
        let created = links.create(fields("Delta", "tools"));

        assert_eq!(links.len(), 4);
        assert_eq!(links.iter().last(), Some(&created));
        assert!(!created.id.is_empty());
        assert!(created.id.parse::<i64>().is_ok());
        assert_eq!(created.fields(), fields("Delta", "tools"));
    }

    #[test]
    fn test_create_ids_are_unique() {
        let mut links = LinkCollection::new();
        let first = links.create(fields("One", "work"));
        let second = links.create(fields("Two", "work"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_fresh_id_skips_taken_values() {
        let links = LinkCollection::from(vec![link("100", "Taken", "work"), link("101", "Also", "work")]);
        assert_eq!(links.fresh_id(100), "102");
        assert_eq!(links.fresh_id(7), "7");
    }

    #[test]
    fn test_update_preserves_position_and_others() {
        let mut links = sample();
        let original = links.clone();

        assert!(links.update("b", fields("Beta 2", "tools")));

        assert_eq!(links.len(), original.len());
        let updated: Vec<_> = links.iter().collect();
        assert_eq!(updated[1].id, "b");
        assert_eq!(updated[1].title, "Beta 2");
        assert_eq!(updated[1].category, "tools");
        assert_eq!(updated[0], original.get("a").unwrap());
        assert_eq!(updated[2], original.get("c").unwrap());
    }

    #[test]
    fn test_update_absent_id_is_noop() {
        let mut links = sample();
        assert!(!links.update("zzz", fields("Nope", "work")));
        assert_eq!(links, sample());
    }

    #[test]
    fn test_delete_present_id() {
        let mut links = sample();
        assert_eq!(links.delete("b"), 1);
        let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_delete_removes_all_duplicates() {
        let mut links = LinkCollection::from(vec![
            link("x", "One", "work"),
            link("y", "Two", "work"),
            link("x", "Three", "work"),
        ]);
        assert_eq!(links.delete("x"), 2);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_delete_absent_id_is_noop() {
        let mut links = sample();
        assert_eq!(links.delete("missing"), 0);
        assert_eq!(links, sample());
    }

    #[test]
    fn test_json_round_trip() {
        let mut links = sample();
        links.create(LinkFields {
            title: "Quotes \"and\" unicode é".to_string(),
            category: "unknown-bucket".to_string(),
            ..LinkFields::default()
        });

        let json = links.to_json().unwrap();
        assert!(json.starts_with('['));
        assert_eq!(LinkCollection::from_json(&json).unwrap(), links);
    }

    #[test]
    fn test_json_shape_matches_storage_format() {
        let json = LinkCollection::default_seed().to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1","title":"Google","url":"https://google.com","icon":"fab fa-google","description":"Search Engine","category":"frequently-used"}]"#
        );
    }

    #[test]
    fn test_display_icon_fallback() {
        let mut l = link("a", "Alpha", "work");
        assert_eq!(l.display_icon(), DEFAULT_ICON);
        l.icon = "fab fa-github".to_string();
        assert_eq!(l.display_icon(), "fab fa-github");
    }
}
