use regex::{Captures, Regex};
use std::sync::LazyLock;

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(.*?)_").unwrap());

const LINK_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

// Backslash-escaped markers and the entities that keep later passes off them
const ESCAPED_MARKERS: [(&str, &str); 4] = [
    ("\\_", "&#95;"),
    ("\\*", "&#42;"),
    ("\\[", "&#91;"),
    ("\\]", "&#93;"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Underline,
}

impl Style {
    pub fn marker(&self) -> &'static str {
        match self {
            Style::Bold => "**",
            Style::Italic => "*",
            Style::Underline => "_",
        }
    }
}

/// Wraps a whole draft in the markers for `style`.
pub fn wrap(text: &str, style: Style) -> String {
    let marker = style.marker();
    format!("{marker}{text}{marker}")
}

/// Backslash-escapes every marker in `text` so `render` shows it literally.
pub fn escape_markers(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
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

fn link(caps: &Captures) -> String {
    let url = caps[2].trim();
    let lowered = url.to_ascii_lowercase();

    if LINK_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        // Percent-encoded so the emphasis passes leave the href alone
        let href = url.replace('_', "%5F").replace('*', "%2A");
        format!("<a href=\"{href}\">{}</a>", &caps[1])
    } else {
        caps[0].to_string()
    }
}

/// Renders untrusted chat text to markup.
///
/// The text is escaped first and backslash-escaped markers (`\_`, `\*`,
/// `\[`, `\]`) are turned into entities. The rewrite passes then run in order
/// (link, bold, italic, underline), each one on the output of the previous
/// one, so markers nested inside a link label are rewritten too. Link URLs
/// are never rewritten. Anything that does not match passes through as
/// literal text.
pub fn render(text: &str) -> String {
    let escaped = ESCAPED_MARKERS
        .iter()
        .fold(escape(text), |text, &(marker, entity)| text.replace(marker, entity));
    let linked = LINK.replace_all(&escaped, link);
    let bold = BOLD.replace_all(&linked, "<b>$1</b>");
    let italic = ITALIC.replace_all(&bold, "<i>$1</i>");

    UNDERLINE.replace_all(&italic, "<u>$1</u>").into_owned()
}
