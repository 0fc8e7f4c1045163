use leptos::prelude::*;
use models::{SettingsStoreFields, ThemeChoice};
use thaw::{Icon, Theme};

use super::settings::SettingsInjection;

pub fn thaw_theme(choice: ThemeChoice) -> Theme {
    match choice {
        ThemeChoice::Dark => Theme::dark(),
        ThemeChoice::Light => Theme::light(),
    }
}

#[component]
pub fn ThemeSwitcher() -> impl IntoView {
    let settings = SettingsInjection::expect_context();
    let on_switch_click = move |_| {
        settings.theme().update(|theme| *theme = theme.toggled());
    };

    let icon = Memo::new(move |_| match settings.theme().get() {
        ThemeChoice::Dark => icondata::BsSun,
        ThemeChoice::Light => icondata::BsMoonStars,
    });

    view! { <Icon height="2em" width="2em" icon=icon on_click=on_switch_click /> }
}
