/// Step panel rendering
///
/// Turns the active step's form model into widgets. Nothing here holds
/// state: every value shown comes from the session.
use iced::widget::image::Handle;
use iced::widget::{button, checkbox, column, container, image, pick_list, row, text, text_input, Column};
use iced::{Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::form::{Control, ControlKind, OptionGroup, StepExtra, StepForm};
use crate::state::session::WizardSession;
use crate::Message;

/// Render whichever step the session reports as visible
pub fn panel<'a>(session: &'a WizardSession, photo: Option<&'a Handle>) -> Element<'a, Message> {
    let visible = session.steps().iter().find(|s| session.is_visible(s.number));
    match visible {
        Some(step) => step_panel(session, step, photo),
        None => column![].into(),
    }
}

fn step_panel<'a>(
    session: &'a WizardSession,
    step: &'a StepForm,
    photo: Option<&'a Handle>,
) -> Element<'a, Message> {
    let mut content: Column<Message> = column![text(&step.title).size(28)].spacing(16);

    for group in &step.option_groups {
        let field = backing_field(step, group);
        content = content.push(option_cards(group, field));
    }

    for control in &step.controls {
        if let Some(widget) = control_widget(control) {
            content = content.push(widget);
        }
    }

    match step.extra {
        StepExtra::None => {}
        StepExtra::Photo => {
            let file_name = session.photo().map(|p| p.file_name.as_str());
            content = content.push(photo_panel(photo, file_name));
        }
        StepExtra::Summary => content = content.push(summary_panel(session)),
    }

    content.into()
}

/// The hidden control an option group writes to (same name by convention)
fn backing_field<'a>(step: &'a StepForm, group: &'a OptionGroup) -> &'a str {
    step.control(&group.id)
        .map(|c| c.name.as_str())
        .unwrap_or(group.id.as_str())
}

fn control_widget(control: &Control) -> Option<Element<'_, Message>> {
    let label = if control.required {
        format!("{} *", control.label)
    } else {
        control.label.clone()
    };

    let widget: Element<Message> = match &control.kind {
        ControlKind::Text => {
            let name = control.name.clone();
            column![
                text(label).size(14),
                text_input("", &control.value)
                    .on_input(move |value| Message::TextChanged(name.clone(), value))
                    .padding(10),
            ]
            .spacing(6)
            .into()
        }
        ControlKind::Select(options) => {
            let name = control.name.clone();
            let selected = Some(control.value.clone()).filter(|v| !v.is_empty());
            column![
                text(label).size(14),
                pick_list(options.as_slice(), selected, move |value| {
                    Message::SelectChanged(name.clone(), value)
                })
                .placeholder("Choose...")
                .width(Length::Fill)
                .padding(10),
            ]
            .spacing(6)
            .into()
        }
        ControlKind::Checkbox { checked } => {
            let name = control.name.clone();
            checkbox(label, *checked)
                .on_toggle(move |value| Message::CheckboxToggled(name.clone(), value))
                .into()
        }
        // Hidden controls are driven by option cards; file controls by the photo panel
        ControlKind::Hidden | ControlKind::File => return None,
    };

    Some(widget)
}

/// Single-choice cards laid out in a wrapping row
fn option_cards<'a>(group: &'a OptionGroup, field: &'a str) -> Element<'a, Message> {
    let cards: Vec<Element<'a, Message>> = group
        .cards
        .iter()
        .map(|card| {
            let style: fn(&Theme, button::Status) -> button::Style = if card.selected {
                button::primary
            } else {
                button::secondary
            };

            button(text(&card.label).size(18))
                .padding([18, 28])
                .style(style)
                .on_press(Message::OptionSelected {
                    group: group.id.clone(),
                    field: field.to_string(),
                    value: card.value.clone(),
                })
                .into()
        })
        .collect();

    Wrap::with_elements(cards)
        .spacing(12.0)
        .line_spacing(12.0)
        .into()
}

fn photo_panel<'a>(photo: Option<&'a Handle>, file_name: Option<&'a str>) -> Element<'a, Message> {
    let placeholder = match file_name {
        Some(name) => format!("{}\n(preview unavailable)", name),
        None => "No photo yet".to_string(),
    };

    let preview: Element<Message> = match photo {
        Some(handle) => image(handle.clone()).width(Length::Fixed(240.0)).into(),
        None => container(text(placeholder).size(14))
            .width(Length::Fixed(240.0))
            .height(Length::Fixed(180.0))
            .center_x(Length::Fixed(240.0))
            .center_y(Length::Fixed(180.0))
            .style(container::bordered_box)
            .into(),
    };

    column![
        text("A clear, well-lit photo of your face helps us find your colours. It's optional.").size(14),
        preview,
        row![
            button("Upload photo").padding(10).on_press(Message::PickPhoto),
            button("Use camera")
                .padding(10)
                .style(button::secondary)
                .on_press(Message::OpenCamera),
        ]
        .spacing(12),
    ]
    .spacing(16)
    .into()
}

fn summary_panel(session: &WizardSession) -> Element<'_, Message> {
    let summary = session.summary();

    let mut lines: Column<Message> = column![text("Your profile").size(20)].spacing(8);
    for line in &summary.lines {
        lines = lines.push(row![text(format!("{}:", line.label)).size(16), text(&line.value).size(16)].spacing(8));
    }

    column![
        container(lines).padding(20).width(Length::Fill).style(container::rounded_box),
        container(text(&summary.note).size(14))
            .padding(16)
            .width(Length::Fill)
            .style(container::bordered_box),
    ]
    .spacing(16)
    .into()
}
