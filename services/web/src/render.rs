use std::fmt::Write;

use diabetes_care::assessment::VerdictCategory;
use diabetes_care::preferences::DisplayMode;
use diabetes_care::session::{ResultView, SessionView};

const STYLESHEET: &str = r#"
:root { --bg: #f5f7fb; --card: #ffffff; --text: #1f2937; --muted: #6b7280; --accent: #2563eb; --risk: #dc2626; --ok: #16a34a; }
[data-theme="dark"] { --bg: #0f172a; --card: #1e293b; --text: #e2e8f0; --muted: #94a3b8; --accent: #60a5fa; --risk: #f87171; --ok: #4ade80; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
.container { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
.header-content { display: flex; justify-content: space-between; align-items: center; }
.subtitle, .form-label, .remedies-footer, .result-time { color: var(--muted); }
.form-container, .result-card, .remedies-section { background: var(--card); border-radius: 12px; padding: 1.5rem; margin-top: 1.5rem; }
.form-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; }
.form-group { display: flex; flex-direction: column; gap: .25rem; }
.form-input { padding: .5rem; border-radius: 8px; border: 1px solid var(--muted); background: var(--bg); color: var(--text); }
.submit-btn, .remedies-btn, .theme-toggle, .close-btn { cursor: pointer; border: none; border-radius: 8px; padding: .6rem 1rem; background: var(--accent); color: #fff; }
.submit-btn[disabled] { opacity: .6; cursor: progress; }
.result-card { display: flex; gap: 1rem; border-left: 6px solid var(--ok); }
.result-card.diabetic { border-left-color: var(--risk); }
.result-card.unavailable { border-left-color: var(--muted); }
.remedies-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 1rem; }
.remedies-header { display: flex; justify-content: space-between; align-items: center; }
"#;

/// Renders the whole assessment page.
///
/// `document_theme` is the process-wide display-mode attribute and lands on
/// the root element, where the stylesheet picks it up.
pub(crate) fn page(view: &SessionView, document_theme: DisplayMode) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n");
    let _ = write!(html, r#"<html lang="en" data-theme="{}">"#, document_theme);
    html.push_str(r#"<head><meta charset="utf-8"><title>DiabetesCare</title>"#);
    if view.busy {
        html.push_str(r#"<meta http-equiv="refresh" content="1">"#);
    }
    let _ = write!(html, "<style>{STYLESHEET}</style></head>");
    html.push_str(r#"<body><div class="app"><div class="container">"#);

    header(&mut html, view.display_mode);
    html.push_str(r#"<div class="main-content">"#);
    form(&mut html, view);
    result(&mut html, view);
    advisories(&mut html, view);
    html.push_str("</div></div></div></body></html>");
    html
}

fn header(html: &mut String, mode: DisplayMode) {
    let (icon, target) = match mode {
        DisplayMode::Dark => ("☀️", DisplayMode::Light),
        DisplayMode::Light => ("🌙", DisplayMode::Dark),
    };
    let _ = write!(
        html,
        concat!(
            r#"<header class="header"><div class="header-content">"#,
            r#"<div class="logo"><span class="logo-icon">🩺</span><h1>DiabetesCare</h1></div>"#,
            r#"<form method="post" action="/theme/toggle">"#,
            r#"<button class="theme-toggle" type="submit" aria-label="Switch to {} mode">"#,
            r#"<span class="theme-icon">{}</span></button></form></div>"#,
            r#"<p class="subtitle">AI-Powered Diabetes Prediction &amp; Health Guidance</p></header>"#,
        ),
        target, icon
    );
}

fn form(html: &mut String, view: &SessionView) {
    html.push_str(r#"<div class="form-container"><h2>Health Assessment</h2>"#);
    html.push_str(r#"<form method="post" action="/assessment" class="prediction-form">"#);
    html.push_str(r#"<div class="form-grid">"#);
    for field in &view.fields {
        let _ = write!(
            html,
            concat!(
                r#"<div class="form-group"><label class="form-label" for="{name}">{label}</label>"#,
                r#"<input type="number" step="any" id="{name}" name="{name}" value="{value}" "#,
                r#"class="form-input" placeholder="{placeholder}" required></div>"#,
            ),
            name = field.name,
            label = escape(field.label),
            value = escape(&field.value),
            placeholder = escape(field.placeholder),
        );
    }
    html.push_str("</div>");

    if view.busy {
        html.push_str(concat!(
            r#"<button type="submit" class="submit-btn" disabled>"#,
            r#"<span class="spinner"></span>Analyzing...</button>"#,
        ));
    } else {
        html.push_str(concat!(
            r#"<button type="submit" class="submit-btn">"#,
            r#"<span>🔍</span>Predict Diabetes Risk</button>"#,
        ));
    }
    html.push_str("</form></div>");
}

fn result(html: &mut String, view: &SessionView) {
    let Some(result) = &view.result else {
        return;
    };

    html.push_str(r#"<div class="result-section">"#);
    match result {
        ResultView::Verdict {
            verdict,
            category,
            received_at,
        } => {
            let (class, icon) = match category {
                VerdictCategory::Positive => ("diabetic", "⚠️"),
                VerdictCategory::Negative => ("non-diabetic", "✅"),
            };
            let _ = write!(
                html,
                concat!(
                    r#"<div class="result-card {}"><div class="result-icon">{}</div>"#,
                    r#"<div class="result-content"><h3>Prediction Result</h3>"#,
                    r#"<p class="result-text">{}</p><p class="result-time">Assessed {}</p>"#,
                ),
                class,
                icon,
                escape(verdict.as_str()),
                received_at.format("%Y-%m-%d %H:%M:%S"),
            );
            if view.advisory.offered() {
                html.push_str(concat!(
                    r#"<form method="post" action="/advisory/toggle">"#,
                    r#"<button class="remedies-btn" type="submit"><span>💡</span>View Home Remedies</button>"#,
                    "</form>",
                ));
            }
            html.push_str("</div></div>");
        }
        ResultView::Unavailable { message } => {
            let _ = write!(
                html,
                concat!(
                    r#"<div class="result-card unavailable"><div class="result-icon">❌</div>"#,
                    r#"<div class="result-content"><h3>Prediction Result</h3>"#,
                    r#"<p class="result-text">{}</p></div></div>"#,
                ),
                escape(message),
            );
        }
    }
    html.push_str("</div>");
}

fn advisories(html: &mut String, view: &SessionView) {
    if !view.advisory.visible() {
        return;
    }

    html.push_str(concat!(
        r#"<div class="remedies-section"><div class="remedies-header">"#,
        "<h3>💚 Natural Home Remedies</h3>",
        r#"<form method="post" action="/advisory/toggle">"#,
        r#"<button class="close-btn" type="submit" aria-label="Close">×</button></form></div>"#,
        r#"<div class="remedies-grid">"#,
    ));
    for (index, entry) in view.advisory.entries.iter().enumerate() {
        let _ = write!(
            html,
            concat!(
                r#"<div class="remedy-card" style="animation-delay: {:.1}s">"#,
                r#"<div class="remedy-icon">{}</div><h4 class="remedy-title">{}</h4>"#,
                r#"<p class="remedy-description">{}</p></div>"#,
            ),
            index as f32 * 0.1,
            escape(&entry.icon),
            escape(&entry.title),
            escape(&entry.description),
        );
    }
    html.push_str(concat!(
        "</div>",
        r#"<div class="remedies-footer"><p>⚠️ Always consult with a healthcare professional before trying new remedies</p></div>"#,
        "</div>",
    ));
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
