//! Thumbnail gallery: a wrapping grid inside a scrollable, followed by
//! the loading indicator or the "Load more" button.

use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::data::{Image, ImageId};
use crate::Message;

/// Identifier of the gallery scrollable, used to snap to new content
pub const SCROLLABLE_ID: &str = "gallery-scrollable";

const TILE_WIDTH: f32 = 320.0;
const TILE_HEIGHT: f32 = 220.0;
const MIN_TILE_HEIGHT: f32 = 160.0;
const MAX_TILE_HEIGHT: f32 = 480.0;
const TILE_SPACING: f32 = 12.0;

/// Relative offset at which reaching the bottom requests another page
pub const LOAD_MORE_THRESHOLD: f32 = 0.98;
/// Scrolling back above this re-enables the bottom trigger
const REARM_THRESHOLD: f32 = 0.9;

pub fn scroll_id() -> scrollable::Id {
    scrollable::Id::new(SCROLLABLE_ID)
}

/// What to render below the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footer {
    Nothing,
    Loading,
    LoadMore,
    /// Every match for the query is shown
    End,
}

pub fn view<'a>(
    images: &'a [Image],
    thumbnails: &'a HashMap<ImageId, Handle>,
    footer: Footer,
) -> Element<'a, Message> {
    let tiles: Vec<Element<'a, Message>> = images
        .iter()
        .map(|img| tile(img, thumbnails.get(&img.id)))
        .collect();

    let grid = Wrap::with_elements(tiles)
        .spacing(TILE_SPACING)
        .line_spacing(TILE_SPACING);

    let footer: Element<'a, Message> = match footer {
        Footer::Nothing => column![].into(),
        Footer::Loading => text("Loading...").size(18).into(),
        Footer::LoadMore => button(text("Load more").size(16))
            .on_press(Message::LoadMore)
            .padding([10, 24])
            .into(),
        Footer::End => text("No more results").size(14).into(),
    };

    let content = column![grid, footer]
        .spacing(20)
        .padding(16)
        .width(Length::Fill)
        .align_x(Alignment::Center);

    scrollable(content)
        .id(scroll_id())
        .on_scroll(|viewport| Message::GalleryScrolled(viewport.relative_offset().y))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Tile height keeping the thumbnail's reported aspect ratio
fn tile_height(img: &Image) -> f32 {
    match img.thumbnail_size {
        Some((width, height)) if width > 0 => {
            (TILE_WIDTH * height as f32 / width as f32).clamp(MIN_TILE_HEIGHT, MAX_TILE_HEIGHT)
        }
        _ => TILE_HEIGHT,
    }
}

fn tile<'a>(img: &'a Image, thumbnail: Option<&'a Handle>) -> Element<'a, Message> {
    let height = tile_height(img);
    let content: Element<'a, Message> = match thumbnail {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(&img.tags).size(12))
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(height))
            .padding(8)
            .style(|theme: &Theme| {
                container::Style::default()
                    .background(theme.extended_palette().background.strong.color)
            })
            .into(),
    };

    button(content)
        .on_press(Message::OpenImage(img.id))
        .padding(0)
        .into()
}

/// Edge trigger for infinite scrolling.
///
/// Fires once when the gallery reaches the bottom, then stays quiet until
/// the user scrolls back up. Snapping to freshly appended content lands at
/// the bottom again and must not chain into another request.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    armed: bool,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self { armed: true }
    }
}

impl ScrollTrigger {
    /// Feed the latest relative vertical offset; true means "load more now"
    pub fn update(&mut self, relative_y: f32) -> bool {
        if relative_y < REARM_THRESHOLD {
            self.armed = true;
            return false;
        }
        if self.armed && relative_y >= LOAD_MORE_THRESHOLD {
            self.armed = false;
            return true;
        }
        false
    }

    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Stay quiet until the user scrolls back up
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::image;

    #[test]
    fn test_fires_once_at_bottom() {
        let mut trigger = ScrollTrigger::default();
        assert!(!trigger.update(0.5));
        assert!(trigger.update(0.99));
        assert!(!trigger.update(1.0));
        assert!(!trigger.update(0.95));
    }

    #[test]
    fn test_rearms_after_scrolling_up() {
        let mut trigger = ScrollTrigger::default();
        assert!(trigger.update(1.0));
        assert!(!trigger.update(0.4));
        assert!(trigger.update(1.0));
    }

    #[test]
    fn test_ignores_nan_offsets() {
        let mut trigger = ScrollTrigger::default();
        assert!(!trigger.update(f32::NAN));
        assert!(trigger.update(1.0));
    }

    #[test]
    fn test_manual_rearm() {
        let mut trigger = ScrollTrigger::default();
        assert!(trigger.update(1.0));
        trigger.rearm();
        assert!(trigger.update(1.0));
    }

    #[test]
    fn test_disarm_waits_for_scroll_up() {
        let mut trigger = ScrollTrigger::default();
        trigger.disarm();
        assert!(!trigger.update(1.0));
        assert!(!trigger.update(0.5));
        assert!(trigger.update(1.0));
    }

    #[test]
    fn test_tile_height_follows_thumbnail_aspect() {
        let mut img = image(1);
        img.thumbnail_size = Some((640, 320));
        assert_eq!(tile_height(&img), 160.0);

        img.thumbnail_size = Some((640, 6400));
        assert_eq!(tile_height(&img), MAX_TILE_HEIGHT);

        img.thumbnail_size = Some((0, 100));
        assert_eq!(tile_height(&img), TILE_HEIGHT);

        img.thumbnail_size = None;
        assert_eq!(tile_height(&img), TILE_HEIGHT);
    }
}
