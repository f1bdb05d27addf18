//! HTML rendering of a cycle's [`View`].
//!
//! The page is rebuilt in full on every request; there is no client-side
//! script. Forms post back to the server, which runs the next cycle.

use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::{
    session::{Banner, Screen, View},
    utils::escape_html,
};

pub const TITLE: &str = "✨ Spotify Playlist Maker";

const BACKGROUND_IMAGE: &str = "https://images.unsplash.com/photo-1647866872319-683f5c4c56e6?fm=jpg&q=60&w=3000";

const STYLE: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    background-size: cover;
    background-position: center;
    background-attachment: fixed;
    color: white;
    font-family: sans-serif;
    font-weight: bold;
}
main {
    max-width: 40rem;
    margin: 0 auto;
    padding: 3rem 1rem;
}
h1 {
    text-align: center;
    font-size: 2.5rem;
    text-shadow: 0 0 15px #FFD700;
}
label {
    display: block;
    margin-bottom: 0.5rem;
}
input[type=text] {
    width: 100%;
    box-sizing: border-box;
    padding: 0.6rem;
    background: rgba(255, 255, 255, 0.1);
    color: white;
    font-weight: bold;
    border: 1px solid rgba(255, 255, 255, 0.4);
    border-radius: 10px;
}
button {
    margin: 0.75rem 0 1.5rem 0;
    padding: 0.6rem 1.2rem;
    background: linear-gradient(145deg, #FFD700, #FFA500);
    color: black;
    font-weight: bold;
    border: none;
    border-radius: 12px;
    box-shadow: 0px 0px 10px #FFD700;
    cursor: pointer;
}
button:hover {
    background: linear-gradient(145deg, #FFC300, #FFB347);
}
.banner {
    padding: 0.75rem 1rem;
    margin-bottom: 1rem;
    border-radius: 10px;
}
.banner-success {
    background-color: #28a745;
    color: white;
}
.banner-warning {
    background-color: #f0ad4e;
    color: black;
}
.banner-error {
    background-color: #cc0000;
    color: white;
}
a {
    color: white;
    font-weight: bold;
}
"#;

/// Turns a view into the HTTP response for the browser.
pub fn respond(view: &View) -> Response {
    match &view.screen {
        Screen::Redirect(url) => Redirect::to(url).into_response(),
        _ => Html(render(view)).into_response(),
    }
}

pub fn render(view: &View) -> String {
    let mut body = String::new();

    for banner in &view.banners {
        body.push_str(&render_banner(banner));
    }

    match &view.screen {
        Screen::LoggedOut => body.push_str(
            r#"<form method="post" action="/login"><button type="submit">🔐 Login with Spotify</button></form>"#,
        ),
        Screen::Redirect(url) => {
            let url = escape_html(url);
            body.push_str(&format!(
                r#"<p>Continue to <a href="{url}">Spotify</a> to log in.</p>"#
            ));
        }
        Screen::Authenticated {
            playlist_active, ..
        } => {
            body.push_str(
                r#"<form method="post" action="/playlist">
<label for="name">Enter Playlist Name</label>
<input type="text" id="name" name="name" autocomplete="off">
<button type="submit">🎵 Create Playlist</button>
</form>"#,
            );
            if *playlist_active {
                body.push_str(
                    r#"<form method="post" action="/song">
<label for="query">Enter Song Name</label>
<input type="text" id="query" name="query" autocomplete="off">
<button type="submit">➕ Add Song</button>
</form>"#,
                );
            }
        }
        Screen::Unavailable => body.push_str(r#"<p><a href="/">Retry</a></p>"#),
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Spotify Playlist Maker</title>
<style>{STYLE}body {{ background-image: url('{BACKGROUND_IMAGE}'); }}</style>
</head>
<body>
<main>
<h1>{TITLE}</h1>
{body}
</main>
</body>
</html>
"#
    )
}

fn render_banner(banner: &Banner) -> String {
    let (class, icon) = match banner {
        Banner::Success(_) => ("banner-success", "✅"),
        Banner::Warning(_) => ("banner-warning", "🔄"),
        Banner::Error(_) => ("banner-error", "⚠️"),
    };
    format!(
        r#"<div class="banner {class}" role="alert">{icon} {text}</div>
"#,
        text = escape_html(banner.text())
    )
}
