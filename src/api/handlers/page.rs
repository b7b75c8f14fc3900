//! Hub page: status, settings controls, and the embedded voice UI.

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

use crate::app_state::AppState;
use crate::config::DEFAULT_SERVER_URL;
use crate::domain::{DEFAULT_TEXT_PROMPT, DEFAULT_VOICE, ProbeSnapshot, ServerAddress};

/// Product name shown in the page title.
pub const APP_NAME: &str = "AIVoice";

/// `GET /` — Render the hub page.
pub async fn hub_page(State(state): State<AppState>) -> Html<String> {
    let address = state.settings.address().await;
    let snapshot = state.probe_service.current();
    Html(render_page(
        &address,
        &snapshot,
        state.settings.embed_enabled(),
    ))
}

/// Shown in place of the console when there is nothing to embed.
const EMBED_PLACEHOLDER: &str =
    "Enable embedding and add a server URL to load the console here.";

/// Wires the page controls to the REST API and keeps the status line in
/// step with the `/ws` feed.
const PAGE_SCRIPT: &str = r##"(() => {
  const byId = (id) => document.getElementById(id);
  const hub = document.querySelector("main");
  const input = byId("server-url");
  const embedToggle = byId("embed-toggle");
  const statusLine = byId("probe-status");
  const openLink = byId("open-chat");
  const embed = byId("embed");
  const placeholder = embed.dataset.placeholder;

  const showProbe = (probe) => {
    if (!probe || !probe.status) return;
    statusLine.className = "status status-" + probe.status;
    statusLine.dataset.status = probe.status;
    statusLine.textContent = probe.note;
    if (probe.status === "checking") setTimeout(refreshProbe, 500);
  };
  const refreshProbe = () =>
    fetch("/api/v1/probe").then((r) => r.json()).then(showProbe).catch(() => {});

  const showSettings = (settings) => {
    if (!settings || settings.normalized_url === undefined) return;
    if (document.activeElement !== input) input.value = settings.server_url;
    embedToggle.checked = settings.embed_enabled;
    openLink.href = settings.normalized_url || "#";
    if (settings.embed_url) {
      const current = embed.querySelector("iframe");
      if (current && current.getAttribute("src") === settings.embed_url) return;
      const frame = document.createElement("iframe");
      frame.src = settings.embed_url;
      frame.title = "Voice UI";
      frame.allow = "microphone";
      frame.width = "100%";
      frame.height = "720";
      embed.replaceChildren(frame);
    } else {
      const note = document.createElement("p");
      note.textContent = placeholder;
      embed.replaceChildren(note);
    }
  };
  const saveSettings = (body) =>
    fetch("/api/v1/settings", {
      method: "PUT",
      headers: { "content-type": "application/json" },
      body: JSON.stringify(body),
    }).then((r) => r.json()).then(showSettings).catch(() => {});

  input.addEventListener("input", () => saveSettings({ server_url: input.value }));
  embedToggle.addEventListener("change", () => saveSettings({ embed_enabled: embedToggle.checked }));
  byId("test-connection").addEventListener("click", () =>
    fetch("/api/v1/probe", { method: "POST" }).then((r) => r.json()).then(showProbe).catch(() => {}));
  byId("celebrate").addEventListener("click", () =>
    fetch("/api/v1/celebrate", { method: "POST" }).catch(() => {}));

  const follow = () => {
    const scheme = location.protocol === "https:" ? "wss://" : "ws://";
    const feed = new WebSocket(scheme + location.host + "/ws");
    feed.addEventListener("message", (message) => {
      let envelope;
      try { envelope = JSON.parse(message.data); } catch { return; }
      const payload = envelope.payload || {};
      switch (payload.event_type) {
        case "probe_state": showProbe(payload.probe); break;
        case "probe_started":
        case "probe_settled": refreshProbe(); break;
        case "address_changed":
          fetch("/api/v1/settings").then((r) => r.json()).then(showSettings).catch(() => {});
          break;
        case "celebration_started": hub.classList.add("celebrating"); break;
        case "celebration_ended": hub.classList.remove("celebrating"); break;
      }
    });
    feed.addEventListener("close", () => setTimeout(follow, 2000));
  };
  follow();
})();"##;

/// Renders the hub page for the given address and probe state.
///
/// The iframe is only emitted when the embed is on and the address is
/// set; its `src` is the normalized address, not a derived endpoint.
#[must_use]
pub fn render_page(address: &ServerAddress, snapshot: &ProbeSnapshot, embed_enabled: bool) -> String {
    let normalized = address.normalized();
    let open_href = if normalized.is_empty() {
        "#".to_string()
    } else {
        escape_html(&normalized)
    };
    let embed = if embed_enabled && !normalized.is_empty() {
        format!(
            r#"<iframe src="{src}" title="Voice UI" allow="microphone" width="100%" height="720"></iframe>"#,
            src = escape_html(&normalized),
        )
    } else {
        format!("<p>{EMBED_PLACEHOLDER}</p>")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{app} Voice Hub</title>
<style>
.status-connected {{ color: #1a7f37; }}
.status-failed {{ color: #cf222e; }}
.celebration {{ display: none; }}
.celebrating .celebration {{ display: block; }}
</style>
</head>
<body>
<main>
<h1>{app} Voice Hub</h1>
<p>Connects to your hosted voice server so you can talk to your AI anywhere.</p>
<p class="celebration" role="status">Handshake received. Your voice server is live!</p>
<p>
<a id="open-chat" href="{open_href}" target="_blank" rel="noreferrer">Open Voice Chat</a>
<button id="test-connection" type="button">Test Connection</button>
</p>
<p id="probe-status" class="status status-{status}" data-status="{status}" aria-live="polite">{note}</p>
<form id="settings-form" onsubmit="return false;">
<h2>Server Settings</h2>
<label for="server-url">Server URL</label>
<input id="server-url" name="server_url" type="text" placeholder="{placeholder}" value="{raw}">
<small>Must be HTTPS for microphone access in browsers.</small>
<p>
<input id="embed-toggle" name="embed_enabled" type="checkbox"{checked}>
<label for="embed-toggle">Embed voice UI below</label>
</p>
<button id="celebrate" type="button">Celebrate launch</button>
</form>
<dl>
<dt>Text prompt</dt><dd>{prompt}</dd>
<dt>Voice</dt><dd>{voice}</dd>
</dl>
<section>
<h2>Voice Console</h2>
<div id="embed" class="embed" data-placeholder="{EMBED_PLACEHOLDER}">{embed}</div>
</section>
</main>
<script>
{PAGE_SCRIPT}
</script>
</body>
</html>
"#,
        app = APP_NAME,
        status = snapshot.status.as_str(),
        note = escape_html(&snapshot.note),
        raw = escape_html(address.raw()),
        placeholder = DEFAULT_SERVER_URL,
        checked = if embed_enabled { " checked" } else { "" },
        prompt = escape_html(DEFAULT_TEXT_PROMPT),
        voice = escape_html(DEFAULT_VOICE),
    )
}

/// Escapes the five HTML-significant characters.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Page routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(hub_page))
}
