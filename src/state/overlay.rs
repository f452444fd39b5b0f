//! Full-size overlay state
//!
//! Tracks which single image (if any) is shown full-size. While the
//! overlay is open it holds a `ScrollGuard`, so background scrolling is
//! suppressed exactly as long as an image is open and released on every
//! exit path, including a new search force-closing it.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::data::Image;

/// Shared flag telling the gallery whether it may scroll.
///
/// Counted rather than boolean so that replacing one open image with
/// another (new guard acquired before the old one drops) stays locked.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress background scrolling until the returned guard is dropped
    pub fn acquire(&self) -> ScrollGuard {
        self.holders.fetch_add(1, Ordering::SeqCst);
        ScrollGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

/// Releases its share of the scroll lock on drop
#[derive(Debug)]
pub struct ScrollGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
enum Slot {
    Closed,
    Open { image: Image, _guard: ScrollGuard },
}

#[derive(Debug)]
pub struct OverlayController {
    lock: ScrollLock,
    slot: Slot,
}

impl OverlayController {
    pub fn new(lock: ScrollLock) -> Self {
        Self {
            lock,
            slot: Slot::Closed,
        }
    }

    /// Show `image` full-size, replacing whatever was open
    pub fn open(&mut self, image: Image) {
        debug!(image_id = image.id, "opening overlay");
        let guard = self.lock.acquire();
        self.slot = Slot::Open {
            image,
            _guard: guard,
        };
    }

    /// Close the overlay. Closing an already closed overlay does nothing.
    pub fn close(&mut self) {
        if self.is_open() {
            debug!("closing overlay");
        }
        self.slot = Slot::Closed;
    }

    /// Close because the image set the overlay points into was discarded
    pub fn force_close(&mut self) {
        if self.is_open() {
            debug!("force-closing overlay after result reset");
        }
        self.slot = Slot::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.slot, Slot::Open { .. })
    }

    /// The image currently shown, if any
    pub fn current(&self) -> Option<&Image> {
        match &self.slot {
            Slot::Open { image, .. } => Some(image),
            Slot::Closed => None,
        }
    }

    pub fn is_scroll_suppressed(&self) -> bool {
        self.lock.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::image;

    #[test]
    fn test_open_then_close_returns_to_closed() {
        let mut overlay = OverlayController::new(ScrollLock::new());
        overlay.open(image(1));
        assert_eq!(overlay.current().map(|i| i.id), Some(1));

        overlay.close();

        assert!(!overlay.is_open());
        assert!(overlay.current().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut overlay = OverlayController::new(ScrollLock::new());
        overlay.close();
        overlay.close();
        assert!(!overlay.is_open());
        assert!(!overlay.is_scroll_suppressed());
    }

    #[test]
    fn test_force_close_from_open() {
        let lock = ScrollLock::new();
        let mut overlay = OverlayController::new(lock.clone());
        overlay.open(image(3));

        overlay.force_close();

        assert!(!overlay.is_open());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_scroll_suppressed_iff_open() {
        let lock = ScrollLock::new();
        let mut overlay = OverlayController::new(lock.clone());
        assert!(!lock.is_locked());

        overlay.open(image(1));
        assert!(lock.is_locked());

        // Swapping images keeps the lock held
        overlay.open(image(2));
        assert!(lock.is_locked());
        assert_eq!(overlay.current().map(|i| i.id), Some(2));

        overlay.close();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_dropping_controller_releases_lock() {
        let lock = ScrollLock::new();
        {
            let mut overlay = OverlayController::new(lock.clone());
            overlay.open(image(1));
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
    }
}
