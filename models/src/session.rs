use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::TokenResponse;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

fn expiry(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let lifetime = i64::try_from(expires_in).unwrap_or(i64::MAX);
    now.checked_add_signed(chrono::Duration::seconds(lifetime.min(i64::MAX / 1_000)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl Session {
    pub fn from_token(username: impl Into<String>, token: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: expiry(now, token.expires_in),
        }
    }

    /// Applies a refreshed token. Backends that do not rotate refresh
    /// tokens omit it, then the current one stays valid.
    pub fn refreshed(&self, token: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            username: self.username.clone(),
            access_token: token.access_token,
            refresh_token: token.refresh_token.or_else(|| self.refresh_token.clone()),
            expires_at: expiry(now, token.expires_in),
        }
    }

    /// Whether this session still holds the access token a request was
    /// issued with.
    pub fn holds(&self, access_token: &str) -> bool {
        self.access_token == access_token
    }

    /// Applies a token refreshed for `issued_for`. A session that was
    /// replaced while the refresh was in flight is left alone.
    pub fn apply_refresh(
        &self,
        issued_for: &str,
        token: TokenResponse,
        now: DateTime<Utc>,
    ) -> Option<Session> {
        self.holds(issued_for).then(|| self.refreshed(token, now))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Time until the refresh should run: `margin` before expiry, never
    /// sooner than `floor` so a short-lived token cannot spin the timer.
    pub fn refresh_delay(&self, now: DateTime<Utc>, margin: Duration, floor: Duration) -> Duration {
        let remaining = self
            .expires_at
            .signed_duration_since(now)
            .to_std()
            .unwrap_or_default();
        remaining.saturating_sub(margin).max(floor)
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
