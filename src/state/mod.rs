/// State management module
///
/// This module handles all search state, including:
/// - Shared data structures (data.rs)
/// - The accumulated result list (results.rs)
/// - The query/pagination state machine (search.rs)
/// - The full-size overlay and its scroll lock (overlay.rs)

pub mod data;
pub mod overlay;
pub mod results;
pub mod search;
