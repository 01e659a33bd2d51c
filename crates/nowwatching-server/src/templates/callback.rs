use nowwatching_core::present::sanitize::escape_html;
use url::form_urlencoded;

/// Confirmation page shown after a successful login.
pub fn render_callback(uid: &str, base_url: &str) -> String {
    let query_uid: String = form_urlencoded::byte_serialize(uid.as_bytes()).collect();
    let query_uid = escape_html(&query_uid);
    let uid = escape_html(uid);
    let base = escape_html(base_url);
    let widget = format!("{base}/view?uid={query_uid}");
    let markdown = format!("[![Now watching]({widget})]({widget}&amp;redirect=true)");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>Trakt connected</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Helvetica,Arial,sans-serif;background:#121212;color:#eee;max-width:720px;margin:40px auto;padding:0 16px;}}
code,pre{{background:#1e1e1e;border-radius:6px;padding:2px 6px;}}
pre{{padding:12px;white-space:pre-wrap;word-break:break-all;}}
a{{color:#53b14f;}}
</style>
</head>
<body>
<h1>Trakt account connected</h1>
<p>Your user id is <code>{uid}</code>.</p>
<p><img src="{widget}" alt="Now watching"/></p>
<p>Embed the widget in a README:</p>
<pre>{markdown}</pre>
<p>Options such as <code>theme</code>, <code>show_offline</code> or <code>show_recents</code> are appended as query parameters, e.g. <a href="{widget}&amp;theme=compact">{widget}&amp;theme=compact</a>.</p>
</body>
</html>
"#
    )
}
