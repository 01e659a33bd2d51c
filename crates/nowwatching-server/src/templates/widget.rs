//! SVG widget markup, one layout per theme.
//!
//! Every text field of [`RenderParams`] arrives escaped; colours are
//! validated hex, so the values are interpolated directly.

use std::fmt::Write;

use nowwatching_core::present::{RecentView, Theme};
use nowwatching_core::RenderParams;

const BASE_CSS: &str = "\
div{font-family:-apple-system,BlinkMacSystemFont,Segoe UI,Helvetica,Arial,sans-serif;}\
.container{border-radius:10px;padding:10px 12px;box-sizing:border-box;}\
.container.light{color:#fff;}\
.container.dark{color:#111;}\
.heading{font-size:12px;letter-spacing:.5px;text-transform:uppercase;opacity:.75;margin-bottom:6px;}\
.title{font-size:18px;font-weight:700;white-space:nowrap;overflow:hidden;text-overflow:ellipsis;}\
.info{font-size:14px;opacity:.8;white-space:nowrap;overflow:hidden;text-overflow:ellipsis;margin-top:2px;}\
.cover{display:block;border-radius:6px;object-fit:cover;}\
#bars{position:relative;height:30px;margin-top:8px;}\
.bar{position:absolute;bottom:0;width:3px;height:3px;border-radius:1px;animation:sound 0ms -800ms linear infinite alternate;}\
@keyframes sound{0%{opacity:.35;height:3px;}100%{opacity:1;height:28px;}}\
.progress{margin-top:8px;font-size:11px;opacity:.8;}\
.progress-track{height:4px;border-radius:2px;background:rgba(127,127,127,.35);overflow:hidden;}\
.progress-fill{height:100%;}\
.progress-times{display:flex;justify-content:space-between;margin-top:3px;}\
.recents{margin-top:12px;}\
.recents-heading{font-size:12px;text-transform:uppercase;opacity:.75;height:30px;line-height:30px;}\
.recent{display:flex;align-items:center;height:48px;}\
.recent img{width:28px;height:42px;border-radius:3px;object-fit:cover;margin-right:10px;}\
.recent-text{overflow:hidden;flex:1;}\
.recent-title{font-size:13px;font-weight:600;white-space:nowrap;overflow:hidden;text-overflow:ellipsis;}\
.recent-info{font-size:11px;opacity:.7;white-space:nowrap;overflow:hidden;text-overflow:ellipsis;}";

/// Render the widget document for `params.theme`.
pub fn render_widget(params: &RenderParams) -> String {
    let width = width(params.theme);
    let height = params.height;
    let mut svg = String::with_capacity(8 * 1024 + params.img_base64.len());

    let _ = write!(
        svg,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg" xmlns:xhtml="http://www.w3.org/1999/xhtml"><foreignObject width="{width}" height="{height}"><div xmlns="http://www.w3.org/1999/xhtml"><style>{BASE_CSS}{theme_css}.container{{background-color:#{bg};}}.bar{{background:#{bar};}}.progress-fill{{background:#{bar};}}{bars}</style>"#,
        theme_css = theme_css(params.theme),
        bg = params.background_color,
        bar = params.bar_color,
        bars = params.css_bar.as_deref().unwrap_or_default(),
    );

    let _ = write!(
        svg,
        r#"<div class="container {mode} theme-{theme}" style="width:{width}px;height:{height}px">"#,
        mode = params.mode.as_str(),
        theme = params.theme.name(),
    );

    match params.theme {
        Theme::Default | Theme::Compact => stacked(&mut svg, params),
        Theme::NatemooRe | Theme::Novatorem => row(&mut svg, params),
        Theme::StremioEmbed => embed(&mut svg, params),
    }
    recents(&mut svg, &params.recents);

    svg.push_str("</div></div></foreignObject></svg>");
    svg
}

fn width(theme: Theme) -> u32 {
    match theme {
        Theme::Default => 300,
        Theme::Compact => 320,
        Theme::NatemooRe | Theme::Novatorem => 480,
        Theme::StremioEmbed => 400,
    }
}

fn theme_css(theme: Theme) -> &'static str {
    match theme {
        Theme::Default => ".cover{width:276px;height:414px;margin-bottom:10px;}",
        Theme::Compact => {
            ".cover{width:296px;height:400px;margin-bottom:8px;}.title{font-size:16px;}.container{padding:8px 12px;}"
        }
        Theme::NatemooRe => {
            ".row{display:flex;align-items:center;height:64px;}.cover{width:43px;height:64px;margin-right:12px;}\
             .text{flex:1;overflow:hidden;}.title{font-size:15px;}.info{font-size:12px;}#bars{width:70px;height:40px;margin:0 0 0 8px;}"
        }
        Theme::Novatorem => {
            ".row{display:flex;align-items:center;height:80px;}.cover{width:53px;height:80px;margin-right:14px;}\
             .text{flex:1;overflow:hidden;}#bars{width:90px;margin:0 0 0 8px;}"
        }
        Theme::StremioEmbed => {
            ".embed{display:flex;height:120px;}.cover{width:80px;height:120px;margin-right:14px;}\
             .text{flex:1;overflow:hidden;display:flex;flex-direction:column;justify-content:center;}\
             .meta{font-size:11px;text-transform:uppercase;opacity:.65;}"
        }
    }
}

fn cover(svg: &mut String, params: &RenderParams) {
    if params.cover_image {
        let _ = write!(
            svg,
            r#"<img class="cover" src="data:{};base64,{}"/>"#,
            params.img_mime, params.img_base64
        );
    }
}

fn text(svg: &mut String, params: &RenderParams) {
    let _ = write!(
        svg,
        r#"<div class="title">{}</div><div class="info">{}</div>"#,
        params.media_title, params.media_info
    );
}

fn bars(svg: &mut String, params: &RenderParams) {
    if !params.content_bar.is_empty() {
        let _ = write!(svg, r#"<div id="bars">{}</div>"#, params.content_bar);
    }
}

fn progress(svg: &mut String, params: &RenderParams) {
    if let Some(progress) = &params.progress {
        let _ = write!(
            svg,
            r#"<div class="progress"><div class="progress-track"><div class="progress-fill" style="width:{:.1}%"></div></div><div class="progress-times"><span>{}</span><span>{}</span></div></div>"#,
            progress.percentage, progress.current_time, progress.remaining_time
        );
    }
}

/// Poster on top, text and bars underneath.
fn stacked(svg: &mut String, params: &RenderParams) {
    let _ = write!(svg, r#"<div class="heading">{}</div>"#, params.title_text);
    cover(svg, params);
    text(svg, params);
    progress(svg, params);
    bars(svg, params);
}

/// Thumbnail, text and bars on one line.
fn row(svg: &mut String, params: &RenderParams) {
    svg.push_str(r#"<div class="row">"#);
    cover(svg, params);
    svg.push_str(r#"<div class="text">"#);
    let _ = write!(svg, r#"<div class="heading">{}</div>"#, params.title_text);
    text(svg, params);
    svg.push_str("</div>");
    bars(svg, params);
    svg.push_str("</div>");
    progress(svg, params);
}

/// Card with a poster column and a meta line.
fn embed(svg: &mut String, params: &RenderParams) {
    svg.push_str(r#"<div class="embed">"#);
    cover(svg, params);
    svg.push_str(r#"<div class="text">"#);
    let _ = write!(svg, r#"<div class="meta">{}</div>"#, params.title_text);
    text(svg, params);
    progress(svg, params);
    bars(svg, params);
    svg.push_str("</div></div>");
}

fn recents(svg: &mut String, recents: &[RecentView]) {
    if recents.is_empty() {
        return;
    }
    svg.push_str(r#"<div class="recents"><div class="recents-heading">Recently watched</div>"#);
    for recent in recents {
        svg.push_str(r#"<div class="recent">"#);
        if let Some(url) = &recent.poster_url {
            let _ = write!(svg, r#"<img src="{url}"/>"#);
        }
        let _ = write!(
            svg,
            r#"<div class="recent-text"><div class="recent-title">{}</div><div class="recent-info">{}"#,
            recent.title, recent.info
        );
        if !recent.watched.is_empty() {
            let _ = write!(svg, " · {}", recent.watched);
        }
        svg.push_str("</div></div></div>");
    }
    svg.push_str("</div>");
}
