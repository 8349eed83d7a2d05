//! Home page endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{error::AppResult, models::dashboard::Dashboard, AppState};

/// Catalog dashboard: record counts and the visitor's earlier visits
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counts and session visit count", body = Dashboard)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<Dashboard>)> {
    let sessions = &state.services.sessions;

    let session_id = jar
        .get(sessions.cookie_name())
        .map(|cookie| cookie.value().to_string());
    let mut session = sessions.load(session_id.as_deref()).await?;

    let counts = state.services.catalog.counts().await?;
    let num_visits = sessions.record_visit(&mut session).await?;

    let jar = if session.is_new() {
        let cookie = Cookie::build((sessions.cookie_name().to_string(), session.id().to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    } else {
        jar
    };

    Ok((jar, Json(Dashboard { counts, num_visits })))
}
