/// Overlays and banners drawn above the wizard
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, opaque, row, text};
use iced::{Alignment, Color, Element, Length};
use reqwest::Url;

use crate::media::camera::{CameraSession, CameraState};
use crate::Message;

/// Dimmed full-window backdrop that swallows input to what's below
fn backdrop(content: Element<'_, Message>) -> Element<'_, Message> {
    opaque(
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.85).into()),
                text_color: Some(Color::WHITE),
                ..container::Style::default()
            }),
    )
}

/// Live camera modal with capture and cancel controls
pub fn camera<'a>(session: &'a CameraSession, frame: Option<&'a Handle>) -> Element<'a, Message> {
    let feed: Element<Message> = match (session.state(), frame) {
        (CameraState::Live, Some(handle)) => image(handle.clone()).width(Length::Fixed(640.0)).into(),
        (CameraState::Live, None) => text("Starting camera...").size(18).into(),
        _ => text("Waiting for camera access...").size(18).into(),
    };

    let capture = button("Take photo")
        .padding(12)
        .on_press_maybe(session.is_live().then_some(Message::CapturePhoto));
    let cancel = button("Cancel")
        .padding(12)
        .style(button::secondary)
        .on_press(Message::CancelCamera);

    backdrop(
        column![feed, row![capture, cancel].spacing(12)]
            .spacing(20)
            .align_x(Alignment::Center)
            .into(),
    )
}

/// Blocking indicator shown while a submission is in flight
pub fn loading<'a>() -> Element<'a, Message> {
    backdrop(
        column![
            text("Preparing your recommendation...").size(24),
            text("Analysing your photo and checking the weather").size(14),
        ]
        .spacing(12)
        .align_x(Alignment::Center)
        .into(),
    )
}

/// Dismissible message banner
pub fn notice(message: &str) -> Element<'_, Message> {
    container(
        row![
            text(message).size(15).width(Length::Fill),
            button("Dismiss")
                .padding([4, 10])
                .style(button::text)
                .on_press(Message::DismissNotice),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(|theme| {
        let palette = theme.extended_palette();
        container::Style {
            background: Some(palette.danger.weak.color.into()),
            text_color: Some(palette.danger.weak.text),
            ..container::Style::default()
        }
    })
    .into()
}

/// Final screen after the backend accepted the profile
pub fn results<'a>(url: &'a Url) -> Element<'a, Message> {
    container(
        column![
            text("All set!").size(40),
            text("Your profile was submitted. Your recommendation is ready at:").size(16),
            text(url.as_str()).size(16),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
