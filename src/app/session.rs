use chrono::Utc;
use leptos::{prelude::*, task::spawn_local};
use models::Session;
use shared_constants::{MIN_TOKEN_REFRESH_DELAY, SESSION_STORAGE_KEY, TOKEN_REFRESH_MARGIN};
use std::time::Duration;

use super::{api::ApiClient, storage};
use crate::log_fn;

#[derive(Clone, Copy, Debug)]
pub struct SessionInjection(pub RwSignal<Option<Session>>);

impl SessionInjection {
    #[track_caller]
    pub fn expect_context() -> RwSignal<Option<Session>> {
        expect_context::<Self>().0
    }
}

/// A stored session is only picked up again while its token is valid.
pub fn restore_session() -> Option<Session> {
    let session = storage::load_json::<Session>(SESSION_STORAGE_KEY)?;
    if session.is_expired(Utc::now()) {
        log::info!("Stored session of {} has expired", session.username);
        storage::remove(SESSION_STORAGE_KEY);
        return None;
    }
    log::info!("Restored session of {}", session.username);
    Some(session)
}

pub fn end_session(session: RwSignal<Option<Session>>) {
    if session.with_untracked(Option::is_some) {
        log::info!("Ending session");
        session.set(None);
    }
}

fn holds(session: RwSignal<Option<Session>>, access_token: &str) -> bool {
    session.with_untracked(|current| current.as_ref().is_some_and(|s| s.holds(access_token)))
}

/// The session may end or change hands while the refresh is in flight, the
/// outcome only applies to the session it was issued for.
async fn refresh_session(session: RwSignal<Option<Session>>, client: ApiClient) {
    log_fn!("refresh_session", {
        let Some(current) = session.get_untracked() else {
            return;
        };
        let issued_for = current.access_token.clone();
        match current.refresh_token.clone() {
            Some(refresh_token) => match client.refresh(&refresh_token).await {
                Ok(token) => {
                    let refreshed = session.with_untracked(|slot| {
                        slot.as_ref()
                            .and_then(|s| s.apply_refresh(&issued_for, token, Utc::now()))
                    });
                    match refreshed {
                        Some(refreshed) => session.set(Some(refreshed)),
                        None => log::debug!("Dropping refresh of a session that has ended"),
                    }
                }
                Err(err) => {
                    log::error!("Token refresh failed: {err}");
                    if holds(session, &issued_for) {
                        end_session(session);
                    }
                }
            },
            None => end_session(session),
        }
    })
}

/// Keeps the session in local storage and renews the access token shortly
/// before it expires. A token that cannot be renewed ends the session
/// when it expires.
pub fn manage_session(session: RwSignal<Option<Session>>, client: ApiClient) {
    Effect::new(move |_| match session.get() {
        Some(current) => storage::save_json(SESSION_STORAGE_KEY, &current),
        None => storage::remove(SESSION_STORAGE_KEY),
    });

    let timer: StoredValue<Option<TimeoutHandle>> = StoredValue::new(None);
    Effect::new(move |_| {
        if let Some(handle) = timer.get_value() {
            handle.clear();
        }
        timer.set_value(None);
        let Some(current) = session.get() else {
            return;
        };
        let now = Utc::now();
        let margin = if current.can_refresh() {
            TOKEN_REFRESH_MARGIN
        } else {
            Duration::ZERO
        };
        let delay = current.refresh_delay(now, margin, MIN_TOKEN_REFRESH_DELAY);
        log::debug!("Session timer fires in {}s", delay.as_secs());
        let client = client.clone();
        match set_timeout_with_handle(
            move || spawn_local(refresh_session(session, client)),
            delay,
        ) {
            Ok(handle) => timer.set_value(Some(handle)),
            Err(err) => log::error!("Failed to schedule token refresh: {err:?}"),
        }
    });
}
