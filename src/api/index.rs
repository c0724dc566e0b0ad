use axum::{Extension, http::HeaderMap, response::Html};

use crate::{
    Res,
    api::AppState,
    generator, management,
    spotify::user,
    types::{Token, UserProfile},
    utils, warning,
};

pub async fn index(Extension(state): Extension<AppState>, headers: HeaderMap) -> Html<String> {
    let me = match management::session_id(&headers) {
        Some(id) => current_user(&state, &id).await,
        None => None,
    };

    Html(render(me.as_ref(), state.config.default_public))
}

/// Looks up the session's user. Any failure logs the session out.
async fn current_user(state: &AppState, session_id: &str) -> Option<UserProfile> {
    let token = state.sessions.token(session_id).await?;

    match lookup(state, session_id, token).await {
        Ok(me) => Some(me),
        Err(e) => {
            warning!("Dropping session after failed profile lookup: {}", e);
            state.sessions.clear(session_id).await;
            None
        }
    }
}

async fn lookup(state: &AppState, session_id: &str, token: Token) -> Res<UserProfile> {
    let token = state.auth.ensure_valid(token).await?;
    state.sessions.set_token(session_id, token.clone()).await;
    user::get_current_user(&*state.api, &token.access_token).await
}

fn render(me: Option<&UserProfile>, default_public: bool) -> String {
    let body = match me {
        Some(me) => {
            let name = me.display_name.as_deref().unwrap_or(&me.id);
            format!(
                "<p>Logged in as <strong>{}</strong>.</p>{}\
                 <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
                utils::escape_html(name),
                playlist_form(default_public)
            )
        }
        None => "<p><a href=\"/login\">Log in with Spotify</a></p>".to_string(),
    };

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>tastelist</title></head>\
         <body><h2>tastelist</h2>{}</body></html>",
        body
    )
}

/// Create-playlist form. The script posts it as JSON to
/// `/api/create_playlist` and prints the outcome below the form.
fn playlist_form(default_public: bool) -> String {
    let (public_selected, private_selected) = if default_public {
        (" selected", "")
    } else {
        ("", " selected")
    };

    format!(
        "<form id=\"playlist-form\" onsubmit=\"return false\">\
         <p><label>Source <select id=\"source\">\
         <option value=\"liked\" selected>Liked songs</option>\
         <option value=\"top\">Top tracks</option></select></label></p>\
         <p><label>Time range <select id=\"time_range\">\
         <option value=\"short_term\">Last 4 weeks</option>\
         <option value=\"medium_term\">Last 6 months</option>\
         <option value=\"long_term\">All time</option></select></label></p>\
         <p><label>Tracks <input id=\"limit\" type=\"number\" min=\"1\" max=\"{max}\" value=\"{limit}\"></label> \
         <button type=\"button\" id=\"allSongsBtn\">All songs</button></p>\
         <p><label>Name <input id=\"name\" type=\"text\" maxlength=\"{name_len}\" value=\"{name}\"></label></p>\
         <p><label>Description <input id=\"description\" type=\"text\" value=\"{liked}\" \
         data-liked=\"{liked}\" data-top=\"{top}\"></label></p>\
         <p><label>Visibility <select id=\"public\">\
         <option value=\"false\"{private_selected}>Private</option>\
         <option value=\"true\"{public_selected}>Public</option></select></label></p>\
         <p><button type=\"button\" id=\"createBtn\">Create playlist</button></p>\
         </form><pre id=\"status\"></pre><script>{script}</script>",
        max = generator::MAX_LIMIT,
        limit = generator::DEFAULT_LIMIT,
        name_len = generator::MAX_NAME_CHARS,
        name = utils::escape_html(generator::DEFAULT_NAME),
        liked = utils::escape_html(generator::LIKED_DESCRIPTION),
        top = utils::escape_html(generator::TOP_DESCRIPTION),
        private_selected = private_selected,
        public_selected = public_selected,
        script = FORM_SCRIPT,
    )
}

const FORM_SCRIPT: &str = r#"
const $ = (id) => document.getElementById(id);

function updateSource() {
  const liked = $("source").value === "liked";
  const desc = $("description");
  $("time_range").disabled = liked;
  $("allSongsBtn").disabled = !liked;
  // only swap the description while it is still one of the defaults
  if (liked && desc.value === desc.dataset.top) desc.value = desc.dataset.liked;
  if (!liked && desc.value === desc.dataset.liked) desc.value = desc.dataset.top;
}

async function createPlaylist() {
  const status = $("status");
  const button = $("createBtn");
  status.textContent = "Working...";
  button.disabled = true;
  try {
    const body = {
      source: $("source").value,
      time_range: $("time_range").value,
      limit: Number($("limit").value),
      name: $("name").value,
      description: $("description").value,
      public: $("public").value === "true",
    };
    const res = await fetch("/api/create_playlist", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(body),
    });
    const data = await res.json().catch(() => ({}));
    if (!res.ok) {
      status.textContent = "Error:\n" + JSON.stringify(data, null, 2);
      return;
    }
    let msg = "OK\nTracks added: " + data.tracks_added + "\nPlaylist ID: " + data.playlist_id;
    if (data.playlist_url) msg += "\nLink: " + data.playlist_url;
    status.textContent = msg;
  } finally {
    button.disabled = false;
  }
}

$("source").addEventListener("change", updateSource);
$("createBtn").addEventListener("click", createPlaylist);
$("allSongsBtn").addEventListener("click", () => {
  if ($("source").value === "liked") $("limit").value = "10000";
});
updateSource();
"#;
