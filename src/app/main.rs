use leptos::prelude::*;
use models::{Route, SettingsStoreFields, UiConfigManager};
use shared_constants::api_base_url;
use thaw::{
    Button, ButtonAppearance, ButtonSize, ConfigProvider, Flex, FlexAlign, FlexGap, FlexJustify,
    Grid, GridItem, Layout, Text, Theme, ToasterProvider,
};

use super::{
    api::ApiClient,
    fetch::provide_backend,
    router::{provide_router, RouterOutlet, SignedIn},
    session::{end_session, manage_session, restore_session, SessionInjection},
    settings::provide_settings,
    station::UiConfigInjection,
    theme_switcher::{thaw_theme, ThemeSwitcher},
};

#[component]
fn Navigation() -> impl IntoView {
    let session = SessionInjection::expect_context();
    let signed_in = SignedIn::expect_context();
    let username = move || session.with(|s| s.as_ref().map(|s| s.username.clone()));
    let on_sign_out_click = move |_| end_session(session);
    view! {
        <Grid cols=2>
            <GridItem column=0>
                <Flex gap=FlexGap::Medium align=FlexAlign::Center>
                    <Text class="app-title">"Weather stations"</Text>
                    <Show when=move || signed_in.get()>
                        <a href=Route::Stations.to_hash()>"Stations"</a>
                        <a href=Route::Settings.to_hash()>"Settings"</a>
                    </Show>
                </Flex>
            </GridItem>
            <GridItem column=1>
                <Flex justify=FlexJustify::End align=FlexAlign::Center>
                    <Show when=move || signed_in.get()>
                        <Text>{username}</Text>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            size=ButtonSize::Small
                            icon=icondata::MdiLogout
                            on_click=on_sign_out_click
                        >
                            "Sign out"
                        </Button>
                    </Show>
                    <ThemeSwitcher />
                </Flex>
            </GridItem>
        </Grid>
    }
}

/// The main app component
#[component]
pub fn Main() -> impl IntoView {
    let settings = provide_settings();
    let theme = RwSignal::new(thaw_theme(settings.theme().get_untracked()));
    Effect::new(move |_| theme.set(thaw_theme(settings.theme().get())));
    let set_body_background_color = move |color: &String| {
        if let Some(document) = window().document() {
            if let Some(body) = document.body() {
                let _ = body
                    .style()
                    .set_property("background-color", color.as_str());
            }
        }
    };
    Effect::new(move |_| {
        theme.with(|theme: &Theme| set_body_background_color(theme.color.color_neutral_background_1()));
    });

    let client = ApiClient::new(api_base_url());
    log::info!("Using weather API at {}", api_base_url());
    let session = RwSignal::new(restore_session());
    provide_context(SessionInjection(session));
    manage_session(session, client.clone());
    provide_backend(client);
    provide_context(UiConfigInjection(StoredValue::new(UiConfigManager::new())));
    provide_router();

    view! {
        <ConfigProvider theme>
            <ToasterProvider>
                <Layout class="outer-layout">
                    <Navigation />
                    <RouterOutlet />
                </Layout>
            </ToasterProvider>
        </ConfigProvider>
    }
}
