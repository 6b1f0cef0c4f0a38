/// State management module
///
/// This module handles all application state, including:
/// - The link data model and CRUD (link.rs)
/// - Key-value storage and link persistence (store.rs)
/// - The profile readiness signal (profile.rs)
/// - The add/edit form state machine (modal.rs)
/// - Rendered categories, search and theme (board.rs)

pub mod board;
pub mod link;
pub mod modal;
pub mod profile;
pub mod store;
