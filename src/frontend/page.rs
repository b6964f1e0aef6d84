//! The single HTML page served by the frontend.

use serde_json::Value;

const API_URL_SCRIPT: &str = "{{API_URL_SCRIPT}}";
const API_URL_TEXT: &str = "{{API_URL_TEXT}}";

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Observability Demo</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; background: #f5f6f8; color: #1f2328; }
    h1 { margin-bottom: 0.25rem; }
    .subtitle { color: #59636e; margin-top: 0; }
    section { background: #fff; border: 1px solid #d1d9e0; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
    pre { background: #f6f8fa; padding: 0.75rem; overflow-x: auto; white-space: pre-wrap; }
    button { padding: 0.4rem 0.9rem; cursor: pointer; }
  </style>
</head>
<body>
  <h1>Observability Demo</h1>
  <p class="subtitle">Backend: <code>{{API_URL_TEXT}}</code></p>
  <button id="refresh" type="button">Refresh</button>

  <section>
    <h2>Frontend health</h2>
    <pre id="frontend-health">Loading...</pre>
  </section>

  <section>
    <h2>Backend health</h2>
    <pre id="backend-health">Loading...</pre>
  </section>

  <section>
    <h2>Backend metadata</h2>
    <pre id="backend-metadata">Loading...</pre>
  </section>

  <script>
    const API_URL = {{API_URL_SCRIPT}};

    async function load(id, url) {
      const el = document.getElementById(id);
      el.textContent = 'Loading...';
      try {
        const res = await fetch(url);
        const text = await res.text();
        el.textContent = 'HTTP ' + res.status + '\n' + text;
      } catch (err) {
        el.textContent = 'Request failed: ' + err.message;
      }
    }

    function refresh() {
      load('frontend-health', '/health');
      load('backend-health', API_URL + '/api/health');
      load('backend-metadata', API_URL + '/api/metadata');
    }

    document.getElementById('refresh').addEventListener('click', refresh);
    refresh();
  </script>
</body>
</html>
"##;

/// Render the page with the backend base URL baked in.
///
/// The URL lands twice: as a JavaScript string literal inside the script and
/// as escaped text in the page header.
pub fn render_page(api_url: &str) -> String {
    let script_literal = Value::String(api_url.to_string())
        .to_string()
        .replace("</", "<\\/");

    TEMPLATE
        .replace(API_URL_SCRIPT, &script_literal)
        .replace(API_URL_TEXT, &escape_html(api_url))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
