use axum::response::Html;

use crate::analysis::controller::Outcome;
use crate::analysis::prompts::Action;

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Render the single page, optionally with the result of the last interaction.
pub fn render_page(model: &str, job_description: &str, outcome: Option<&Outcome>) -> Html<String> {
    let html = INDEX_HTML
        .replace("{{ job_description }}", &html_escape(job_description))
        .replace("{{ buttons }}", &render_buttons())
        .replace("{{ result }}", &outcome.map(render_outcome).unwrap_or_default())
        .replace("{{ model }}", &html_escape(model));
    Html(html)
}

fn render_buttons() -> String {
    Action::ALL
        .iter()
        .map(|action| {
            format!(
                r#"      <button type="submit" name="action" value="{}">{}</button>"#,
                action.as_str(),
                html_escape(action.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_outcome(outcome: &Outcome) -> String {
    let text = html_escape(&outcome.to_string());
    match outcome.heading() {
        Some(heading) => format!(
            "    <h2>{}</h2>\n    <div class=\"response\">{text}</div>",
            html_escape(heading)
        ),
        None => format!("    <p class=\"message\">{text}</p>"),
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Keeps user text from forming template placeholders.
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}
