/// Escape text for element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            escape_html(r#"Tom & Jerry <"Pilot"> it's"#),
            "Tom &amp; Jerry &lt;&quot;Pilot&quot;&gt; it&#x27;s"
        );
        assert_eq!(escape_html("2010 • Sci-Fi"), "2010 • Sci-Fi");
    }
}
