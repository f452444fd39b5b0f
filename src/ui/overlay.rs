//! Full-size image overlay.
//!
//! The backdrop covers the whole window and closes the overlay when
//! clicked. The framed image is wrapped in `opaque` so clicks on it are
//! captured before they reach the backdrop, and the outer `opaque` keeps
//! pointer and wheel input away from the gallery underneath.

use iced::widget::image::Handle;
use iced::widget::{center, column, container, image, mouse_area, opaque, text};
use iced::{Color, ContentFit, Element, Length, Theme};

use crate::state::data::Image;
use crate::Message;

const BACKDROP: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.8,
};
const MAX_FRAME_WIDTH: f32 = 1280.0;

pub fn view<'a>(img: &'a Image, full_size: Option<&'a Handle>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match full_size {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .into(),
        None => container(text("Loading...").size(18))
            .padding(40)
            .center_x(Length::Fill)
            .into(),
    };

    let frame = container(column![picture, text(caption(img)).size(14)].spacing(8))
        .max_width(MAX_FRAME_WIDTH)
        .padding(8)
        .style(container::rounded_box);

    let backdrop = mouse_area(
        center(opaque(frame))
            .padding(40)
            .style(|_theme: &Theme| container::Style::default().background(BACKDROP)),
    )
    .on_press(Message::CloseOverlay);

    opaque(backdrop)
}

/// Tags, followed by the original dimensions when the service reports them
fn caption(img: &Image) -> String {
    match img.full_size {
        Some((width, height)) => format!("{}  ({width} x {height})", img.tags),
        None => img.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::image;

    #[test]
    fn test_caption_includes_known_dimensions() {
        let mut img = image(7);
        assert_eq!(caption(&img), "tag7, animal");

        img.full_size = Some((4000, 2250));
        assert_eq!(caption(&img), "tag7, animal  (4000 x 2250)");
    }
}
