use chrono::Utc;
use leptos::prelude::*;
use models::Session;
use thaw::{
    Button, ButtonAppearance, Card, CardHeader, Flex, FlexGap, Input, InputType, MessageBar,
    MessageBarBody, MessageBarIntent, Text, TextTag,
};

use super::{api::ApiError, fetch::Backend, session::SessionInjection};

/// Sign-in form. A successful login starts the session, the router then
/// moves on to the view that asked for it.
#[component]
pub fn Login() -> impl IntoView {
    let backend = Backend::expect_context();
    let session = SessionInjection::expect_context();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let login_action = Action::new_local(move |(user, pass): &(String, String)| {
        let (user, pass) = (user.clone(), pass.clone());
        let client = backend.client();
        async move {
            match client.login(&user, &pass).await {
                Ok(token) => {
                    log::info!("Signed in as {user}");
                    error.set(None);
                    password.set(String::new());
                    session.set(Some(Session::from_token(user, token, Utc::now())));
                }
                Err(ApiError::Unauthorized) => {
                    error.set(Some("Wrong username or password".to_string()));
                }
                Err(err) => {
                    log::error!("Login failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
        }
    });
    let pending = login_action.pending();
    let incomplete = Signal::derive(move || {
        username.with(|name| name.trim().is_empty()) || password.with(String::is_empty)
    });
    let on_login_click = move |_| {
        login_action.dispatch((
            username.get_untracked().trim().to_string(),
            password.get_untracked(),
        ));
    };

    view! {
        <Flex justify=thaw::FlexJustify::Center class="login-layout">
            <Card class="login-card">
                <CardHeader>
                    <Text tag=TextTag::H2>"Sign in"</Text>
                </CardHeader>
                <Flex vertical=true gap=FlexGap::Medium>
                    {move || {
                        error
                            .get()
                            .map(|message| {
                                view! {
                                    <MessageBar intent=MessageBarIntent::Error>
                                        <MessageBarBody>{message}</MessageBarBody>
                                    </MessageBar>
                                }
                            })
                    }}
                    <Input value=username placeholder="Username" />
                    <Input value=password input_type=InputType::Password placeholder="Password" />
                    <Button
                        appearance=ButtonAppearance::Primary
                        loading=pending
                        disabled=incomplete
                        on_click=on_login_click
                        icon=icondata::MdiLogin
                    >
                        "Sign in"
                    </Button>
                </Flex>
            </Card>
        </Flex>
    }
}
