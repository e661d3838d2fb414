//! Viewer page.

use axum::response::Html;

/// Values substituted into the viewer page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerPage {
    pub title: String,
    /// Absolute path of the instance's static assets
    pub assets_path: String,
    /// Absolute URL of the JSON document
    pub document_url: String,
    pub login_path: Option<String>,
}

impl ViewerPage {
    pub fn render(&self) -> Html<String> {
        let login = match &self.login_path {
            Some(path) => format!("loginPath: {},", js_string(path)),
            None => String::new(),
        };

        Html(format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="{assets}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{assets}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{
      url: {url},
      {login}
      dom_id: "#swagger-ui"
    }});
  </script>
</body>
</html>
"##,
            title = escape(&self.title),
            assets = escape(&self.assets_path),
            url = js_string(&self.document_url),
        ))
    }
}

/// Escape text for an HTML element body or a quoted attribute.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quoted JavaScript string literal that cannot close the surrounding
/// `<script>` element.
fn js_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_owned())
        .to_string()
        .replace("</", "<\\/")
}
