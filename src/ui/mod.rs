/// User interface widgets
///
/// Everything here is a pure function of application state:
/// - Search bar (searchbar.rs)
/// - Thumbnail gallery with load-more footer (gallery.rs)
/// - Full-size overlay (overlay.rs)
/// - Notice toasts (notices.rs)

pub mod gallery;
pub mod notices;
pub mod overlay;
pub mod searchbar;
