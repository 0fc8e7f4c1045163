use leptos::{ev, prelude::*};
use models::Route;

use super::{
    login::Login, sensor::SensorView, session::SessionInjection, settings::SettingsView,
    station::StationView, stations::Stations,
};

fn current_hash() -> String {
    window().location().hash().unwrap_or_default()
}

/// Pushes a history entry, the hash listener picks the route up.
pub fn navigate(route: &Route) {
    if let Err(err) = window().location().set_hash(&route.to_hash()) {
        log::error!("Failed to navigate to {}: {err:?}", route.to_path());
    }
}

/// Replaces the current history entry, for redirects.
fn redirect(route: &Route) {
    if let Err(err) = window().location().replace(&route.to_hash()) {
        log::error!("Failed to redirect to {}: {err:?}", route.to_path());
    }
}

/// Changes only on sign in and sign out, not on token renewal.
#[derive(Clone, Copy, Debug)]
pub struct SignedIn(pub Memo<bool>);

impl SignedIn {
    #[track_caller]
    pub fn expect_context() -> Memo<bool> {
        expect_context::<Self>().0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RouterInjection {
    pub route: ReadSignal<Route>,
    after_login: StoredValue<Option<Route>>,
}

impl RouterInjection {
    #[track_caller]
    pub fn expect_context() -> Self {
        expect_context::<Self>()
    }
}

/// Tracks `location.hash` and enforces the auth guard: routes that need a
/// session redirect to the login view, which returns to them afterwards.
pub fn provide_router() -> RouterInjection {
    let (route, set_route) = signal(Route::from_hash(&current_hash()));
    let _ = window_event_listener(ev::hashchange, move |_| {
        let next = Route::from_hash(&current_hash());
        log::debug!("Route changed to {next:?}");
        set_route.set(next);
    });
    let router = RouterInjection {
        route,
        after_login: StoredValue::new(None),
    };

    let session = SessionInjection::expect_context();
    let signed_in = Memo::new(move |_| session.with(Option::is_some));
    provide_context(SignedIn(signed_in));
    Effect::new(move |_| {
        let signed_in = signed_in.get();
        match route.get() {
            Route::Home => redirect(&Route::Stations),
            Route::Login if signed_in => {
                let target = router.after_login.get_value().unwrap_or(Route::Stations);
                router.after_login.set_value(None);
                redirect(&target);
            }
            target if target.requires_auth() && !signed_in => {
                log::info!("{} needs a session", target.to_path());
                router.after_login.set_value(Some(target));
                redirect(&Route::Login);
            }
            _ => {}
        }
    });

    provide_context(router);
    router
}

#[component]
fn NotFound(path: String) -> impl IntoView {
    view! {
        <div class="not-found">
            <h2>"Page not found"</h2>
            <p>{format!("Nothing lives at {path}.")}</p>
            <a href=Route::Stations.to_hash()>"Back to stations"</a>
        </div>
    }
}

/// Renders the view of the current route.
#[component]
pub fn RouterOutlet() -> impl IntoView {
    let router = RouterInjection::expect_context();
    let signed_in = SignedIn::expect_context();
    move || {
        let route = router.route.get();
        if route.requires_auth() && !signed_in.get() {
            return view! { <div class="hidden" /> }.into_any();
        }
        match route {
            Route::Home | Route::Stations => view! { <Stations /> }.into_any(),
            Route::Login => view! { <Login /> }.into_any(),
            Route::Station { id } => view! { <StationView station_id=id /> }.into_any(),
            Route::Sensor {
                station_id,
                sensor_id,
            } => view! { <SensorView station_id sensor_id /> }.into_any(),
            Route::Settings => view! { <SettingsView /> }.into_any(),
            Route::NotFound(path) => view! { <NotFound path /> }.into_any(),
        }
    }
}
