use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    server::AppState,
    session::{Banner, View, complete_login},
    spotify::Authenticator,
    success, ui, warning,
};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Redirect target of the Spotify authorization page.
///
/// Completes the login pending on the caller's session and sends the browser
/// back to the page. A failed or cancelled authorization renders the logged
/// out page with the reason.
pub async fn callback<A: Authenticator>(
    Query(params): Query<CallbackParams>,
    State(state): State<Arc<AppState<A>>>,
    jar: CookieJar,
) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let mut session = session.lock().await;

    let result = complete_login(
        &mut *session,
        params.code.as_deref(),
        params.state.as_deref(),
        params.error.as_deref(),
    )
    .await;

    match result {
        Ok(()) => {
            success!("Authorization completed");
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            warning!("Authorization failed: {}", e);
            let view =
                View::logged_out().with_banner(Banner::Error(format!("Login failed: {}", e)));
            (jar, ui::respond(&view)).into_response()
        }
    }
}
