/// Add/edit link dialog, drawn over the board
use iced::widget::{button, center, column, container, horizontal_space, opaque, pick_list, row, stack, text, text_input};
use iced::{Color, Element};

use crate::state::link::Category;
use crate::state::modal::{Field, Modal};
use crate::Message;

/// Stack the dialog on top of `base` when the modal is visible
pub fn overlay<'a>(base: Element<'a, Message>, modal: &'a Modal) -> Element<'a, Message> {
    let (Some(heading), Modal::Visible { form, hint, saving, .. }) = (modal.heading(), modal) else {
        return base;
    };
    let saving = *saving;

    // Inputs without handlers render disabled while the save is running
    let input = |placeholder: &'a str, value: &'a str, field: Field| {
        let input = text_input(placeholder, value).padding(8);
        if saving {
            input
        } else {
            input
                .on_input(move |v| Message::FormFieldChanged(field, v))
                .on_submit(Message::Submit)
        }
    };

    let mut body = column![
        text(heading).size(24),
        input("Title", &form.title, Field::Title),
        input("URL", &form.url, Field::Url),
        input("Icon class (e.g., fab fa-github)", &form.icon, Field::Icon),
        input("Description", &form.description, Field::Description),
        pick_list(Category::ALL, form.selected_category(), Message::CategorySelected)
            .placeholder("Category"),
    ]
    .spacing(12);

    if let Some(hint) = hint {
        body = body.push(text(hint).size(14));
    }

    body = body.push(row![
        horizontal_space(),
        button(text("Cancel")).on_press(Message::Cancel).padding(8),
        button(text(if saving { "Saving..." } else { "Save" }))
            .on_press_maybe((!saving).then_some(Message::Submit))
            .padding(8),
    ]
    .spacing(8));

    let dialog = container(body).width(420.0).padding(20).style(container::rounded_box);

    stack![
        base,
        opaque(center(opaque(dialog)).style(|_theme| container::Style {
            background: Some(Color { a: 0.6, ..Color::BLACK }.into()),
            ..container::Style::default()
        })),
    ]
    .into()
}
