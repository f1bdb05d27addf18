use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    server::AppState,
    session::{Action, run_cycle},
    spotify::Authenticator,
    ui,
};

#[derive(Debug, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SongForm {
    #[serde(default)]
    pub query: String,
}

pub async fn index<A: Authenticator>(
    State(state): State<Arc<AppState<A>>>,
    jar: CookieJar,
) -> Response {
    cycle(state, jar, Action::Render).await
}

pub async fn login<A: Authenticator>(
    State(state): State<Arc<AppState<A>>>,
    jar: CookieJar,
) -> Response {
    cycle(state, jar, Action::Login).await
}

pub async fn create_playlist<A: Authenticator>(
    State(state): State<Arc<AppState<A>>>,
    jar: CookieJar,
    Form(form): Form<PlaylistForm>,
) -> Response {
    cycle(state, jar, Action::CreatePlaylist(form.name)).await
}

pub async fn add_song<A: Authenticator>(
    State(state): State<Arc<AppState<A>>>,
    jar: CookieJar,
    Form(form): Form<SongForm>,
) -> Response {
    cycle(state, jar, Action::AddSong(form.query)).await
}

async fn cycle<A: Authenticator>(
    state: Arc<AppState<A>>,
    jar: CookieJar,
    action: Action,
) -> Response {
    let (jar, session) = state.sessions.resolve(jar).await;
    let mut session = session.lock().await;
    let view = run_cycle(&state.authenticator, &mut *session, action).await;
    (jar, ui::respond(&view)).into_response()
}
