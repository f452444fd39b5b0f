use iced::widget::{button, container, row, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use crate::Message;

pub const PLACEHOLDER: &str = "Search images and photos";

/// Query input with a submit button. Enter in the input also submits.
pub fn view(input: &str) -> Element<'_, Message> {
    let field = text_input(PLACEHOLDER, input)
        .on_input(Message::InputChanged)
        .on_submit(Message::Submit)
        .padding(10)
        .size(16)
        .width(Length::Fixed(480.0));

    let submit = button(text("Search").size(16))
        .on_press(Message::Submit)
        .padding(10);

    container(row![field, submit].spacing(8).align_y(Alignment::Center))
        .padding(16)
        .center_x(Length::Fill)
        .style(|theme: &Theme| {
            container::Style::default().background(theme.extended_palette().background.weak.color)
        })
        .into()
}
