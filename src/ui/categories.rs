/// Category sections and link cards
use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

use crate::state::board::{Card, Chevron, RenderedBoard, Section};
use crate::Message;

const CARD_WIDTH: f32 = 240.0;

pub fn view(rendered: &RenderedBoard) -> Element<'_, Message> {
    column(rendered.sections.iter().map(section))
        .spacing(24)
        .width(Length::Fill)
        .into()
}

fn section(section: &Section) -> Element<'_, Message> {
    let chevron = match section.chevron() {
        Chevron::Down => "▾",
        Chevron::Right => "▸",
    };

    let header = button(
        row![text(section.title()).size(22), horizontal_space(), text(chevron).size(22)]
            .align_y(Alignment::Center),
    )
    .on_press(Message::ToggleSection(section.category))
    .style(button::text)
    .width(Length::Fill);

    let mut content = column![header].spacing(12);
    if section.expanded {
        content = content.push(row(section.visible_cards().map(card)).spacing(12).wrap());
    }
    content.into()
}

fn card(card: &Card) -> Element<'_, Message> {
    let link = &card.link;

    let actions = row![
        button(text("✎").size(14))
            .on_press(Message::EditRequested(link.clone()))
            .style(button::text),
        button(text("✕").size(14))
            .on_press(Message::DeleteRequested(link.id.clone()))
            .style(button::text),
    ];

    let top = row![text(&card.badge).size(12), horizontal_space(), actions].align_y(Alignment::Center);

    let title = button(text(&link.title).size(18))
        .on_press(Message::OpenLink(link.url.clone()))
        .style(button::text)
        .padding(0);

    container(column![top, title, text(&link.description).size(14)].spacing(8))
        .width(CARD_WIDTH)
        .padding(12)
        .style(container::rounded_box)
        .into()
}
