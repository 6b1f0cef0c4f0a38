/// Top bar: profile, theme toggle, search box and add button
use iced::widget::{button, container, horizontal_space, image, row, text, text_input, tooltip};
use iced::{Alignment, Element, Length};

use crate::state::board::ThemeState;
use crate::state::profile::Profile;
use crate::Message;

const AVATAR_PX: f32 = 48.0;

/// `loaded` gates the add button; links cannot change before they are loaded
pub fn view<'a>(
    profile: Option<&'a Profile>,
    theme: ThemeState,
    query: &'a str,
    loaded: bool,
) -> Element<'a, Message> {
    let name = profile.map(|p| p.name.as_str()).unwrap_or_default();

    let avatar: Element<'a, Message> = match profile {
        Some(Profile {
            avatar_file: Some(path),
            ..
        }) => image(image::Handle::from_path(path.clone()))
            .width(AVATAR_PX)
            .height(AVATAR_PX)
            .into(),
        // Remote avatars are not fetched; show the initial and expose the URL on hover
        Some(profile) if !profile.avatar_url.is_empty() => tooltip(
            initial_avatar(profile.initial()),
            text(&profile.avatar_url).size(12),
            tooltip::Position::Bottom,
        )
        .into(),
        Some(profile) => initial_avatar(profile.initial()),
        None => initial_avatar(String::new()),
    };

    let theme_label = match theme {
        ThemeState::Light => "Dark mode",
        ThemeState::Dark => "Light mode",
    };

    row![
        avatar,
        text(name).size(20),
        horizontal_space(),
        text_input("Search links...", query)
            .on_input(Message::SearchChanged)
            .padding(8)
            .width(Length::Fixed(280.0)),
        button(text(theme_label)).on_press(Message::ToggleTheme).padding(8),
        button(text("Add Link"))
            .on_press_maybe(loaded.then_some(Message::AddRequested))
            .padding(8),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

fn initial_avatar<'a>(initial: String) -> Element<'a, Message> {
    container(text(initial).size(22))
        .width(AVATAR_PX)
        .height(AVATAR_PX)
        .center_x(AVATAR_PX)
        .center_y(AVATAR_PX)
        .style(container::rounded_box)
        .into()
}
