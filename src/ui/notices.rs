use iced::widget::{column, container, text};
use iced::{Alignment, Border, Color, Element, Length, Theme};

use crate::notice::{Notice, NoticeBoard, NoticeLevel};
use crate::Message;

const INFO_BACKGROUND: Color = Color {
    r: 0.15,
    g: 0.45,
    b: 0.85,
    a: 1.0,
};
const FAILURE_BACKGROUND: Color = Color {
    r: 0.8,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

/// Stack of active notices, centered near the top of the window
pub fn view(board: &NoticeBoard) -> Element<'_, Message> {
    let toasts = board.iter().map(toast);

    container(
        column(toasts)
            .spacing(8)
            .width(Length::Fixed(450.0))
            .align_x(Alignment::Center),
    )
    .padding([80, 0])
    .center_x(Length::Fill)
    .into()
}

fn toast(notice: &Notice) -> Element<'_, Message> {
    let background = match notice.level {
        NoticeLevel::Info => INFO_BACKGROUND,
        NoticeLevel::Failure => FAILURE_BACKGROUND,
    };

    container(text(&notice.message).size(16))
        .padding(14)
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            text_color: Some(Color::WHITE),
            background: Some(background.into()),
            border: Border::default().rounded(6.0),
            ..container::Style::default()
        })
        .into()
}
