/// View layer
///
/// Pure functions from board state to iced elements:
/// - header.rs: profile, theme toggle, search, add button
/// - categories.rs: collapsible sections and link cards
/// - modal.rs: add/edit dialog overlay

pub mod categories;
pub mod header;
pub mod modal;
