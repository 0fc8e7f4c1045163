use leptos::prelude::*;
use models::Session;
use std::future::Future;
use thaw::{MessageBar, MessageBarBody, MessageBarIntent, MessageBarTitle, Spinner};

use super::{
    api::{ApiClient, ApiError},
    session::{end_session, SessionInjection},
};

/// State of a fetch-then-render view.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(ApiError),
}

impl<T> From<Result<T, ApiError>> for LoadState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => LoadState::Failed(err),
        }
    }
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Authorized access to the backend. A rejected token ends the session,
/// which sends the user back to the login view.
#[derive(Clone, Copy, Debug)]
pub struct Backend {
    client: StoredValue<ApiClient>,
    session: RwSignal<Option<Session>>,
}

impl Backend {
    pub fn new(client: ApiClient, session: RwSignal<Option<Session>>) -> Self {
        Self {
            client: StoredValue::new(client),
            session,
        }
    }

    #[track_caller]
    pub fn expect_context() -> Self {
        expect_context::<Self>()
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    pub async fn call<T, F, Fut>(self, request: F) -> Result<T, ApiError>
    where
        F: FnOnce(ApiClient, Session) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(session) = self.session.get_untracked() else {
            return Err(ApiError::Unauthorized);
        };
        let result = request(self.client(), session).await;
        if let Err(err) = &result {
            log::error!("Backend request failed: {err}");
            if *err == ApiError::Unauthorized {
                end_session(self.session);
            }
        }
        result
    }

    pub async fn load_into<T, F, Fut>(self, target: RwSignal<LoadState<T>>, request: F)
    where
        T: Send + Sync + 'static,
        F: FnOnce(ApiClient, Session) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let state = LoadState::from(self.call(request).await);
        target.set(state);
    }
}

pub fn provide_backend(client: ApiClient) {
    provide_context(Backend::new(client, SessionInjection::expect_context()));
}

#[component]
pub fn LoadError(error: ApiError) -> impl IntoView {
    let title = match error {
        ApiError::Unauthorized => "Signed out",
        ApiError::Status(404, _) => "Not found",
        ApiError::Network(_) => "Backend unreachable",
        _ => "Loading failed",
    };
    view! {
        <MessageBar intent=MessageBarIntent::Error>
            <MessageBarBody>
                <MessageBarTitle>{title}</MessageBarTitle>
                {error.to_string()}
            </MessageBarBody>
        </MessageBar>
    }
}

/// Renders the loaded value with `render`, a spinner while loading and the
/// error otherwise.
pub fn render_load_state<T, V>(
    state: RwSignal<LoadState<T>>,
    render: impl Fn(&T) -> V + Send + Sync + 'static,
) -> impl IntoView
where
    T: Send + Sync + 'static,
    V: IntoView + 'static,
{
    move || {
        state.with(|state| match state {
            LoadState::Loading => view! { <Spinner label="Loading" /> }.into_any(),
            LoadState::Loaded(value) => render(value).into_any(),
            LoadState::Failed(error) => view! { <LoadError error=error.clone() /> }.into_any(),
        })
    }
}
