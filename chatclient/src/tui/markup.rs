use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

// Tags emitted by the markdown renderer
enum Tag {
    Bold(bool),
    Italic(bool),
    Underline(bool),
    LinkOpen(String),
    LinkClose,
}

impl Tag {
    fn parse(tag: &str) -> Option<Tag> {
        match tag {
            "b" => Some(Tag::Bold(true)),
            "/b" => Some(Tag::Bold(false)),
            "i" => Some(Tag::Italic(true)),
            "/i" => Some(Tag::Italic(false)),
            "u" => Some(Tag::Underline(true)),
            "/u" => Some(Tag::Underline(false)),
            "/a" => Some(Tag::LinkClose),
            _ => {
                let href = tag.strip_prefix("a href=\"")?.strip_suffix('"')?;
                let href = unescape(href).replace("%5F", "_").replace("%2A", "*");
                Some(Tag::LinkOpen(href))
            }
        }
    }
}

#[derive(Default)]
struct Nesting {
    bold: usize,
    italic: usize,
    underline: usize,
    link: Option<String>,
}

impl Nesting {
    fn style(&self) -> Style {
        let mut style = Style::default();
        if self.bold > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline > 0 || self.link.is_some() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.link.is_some() {
            style = style.fg(Color::Cyan);
        }
        style
    }
}

const ENTITIES: [(&str, char); 9] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&#95;", '_'),
    ("&#42;", '*'),
    ("&#91;", '['),
    ("&#93;", ']'),
];

fn decode_entity(text: &str) -> Option<(char, usize)> {
    ENTITIES
        .iter()
        .find(|(entity, _)| text.starts_with(entity))
        .map(|(entity, ch)| (*ch, entity.len()))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some((decoded, len)) = decode_entity(rest) {
            out.push(decoded);
            rest = &rest[len..];
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    out
}

fn flush(spans: &mut Vec<Span<'static>>, buf: &mut String, style: Style) {
    if !buf.is_empty() {
        spans.push(Span::styled(std::mem::take(buf), style));
    }
}

/// Turns renderer markup into styled spans. Links are shown as their label
/// followed by the target in brackets. Unknown tags stay literal.
pub fn to_spans(markup: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut buf = String::new();
    let mut nesting = Nesting::default();
    let mut rest = markup;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            let tag = rest.find('>').and_then(|end| Some((Tag::parse(&rest[1..end])?, end)));

            if let Some((tag, end)) = tag {
                flush(&mut spans, &mut buf, nesting.style());

                match tag {
                    Tag::Bold(open) => nesting.bold = adjust(nesting.bold, open),
                    Tag::Italic(open) => nesting.italic = adjust(nesting.italic, open),
                    Tag::Underline(open) => nesting.underline = adjust(nesting.underline, open),
                    Tag::LinkOpen(href) => nesting.link = Some(href),
                    Tag::LinkClose => {
                        if let Some(href) = nesting.link.take() {
                            spans.push(Span::styled(
                                format!(" [{href}]"),
                                Style::default().fg(Color::DarkGray),
                            ));
                        }
                    }
                }

                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((decoded, len)) = decode_entity(rest) {
            buf.push(decoded);
            rest = &rest[len..];
            continue;
        }

        buf.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush(&mut spans, &mut buf, nesting.style());

    spans
}

fn adjust(depth: usize, open: bool) -> usize {
    if open {
        depth + 1
    } else {
        depth.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::markdown::render;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn styles_follow_tags() {
        let spans = to_spans(&render("plain **bold** *it*"));

        assert_eq!(text(&spans), "plain bold it");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn entities_are_decoded() {
        let spans = to_spans(&render("<script> & \"q\""));
        assert_eq!(text(&spans), "<script> & \"q\"");
    }

    #[test]
    fn links_show_target() {
        let spans = to_spans(&render("[docs](http://a/b?x=1&y=2)"));
        assert_eq!(text(&spans), "docs [http://a/b?x=1&y=2]");
        assert_eq!(spans[0].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn shared_file_link_survives_markers() {
        let message = chatclient::api::shared_file_message(
            "my_file_v2.png",
            "http://h/uploads/my_file_v2.png",
        );
        let spans = to_spans(&render(&message));

        assert_eq!(
            text(&spans),
            "Shared a file: my_file_v2.png [http://h/uploads/my_file_v2.png]"
        );
        assert!(spans
            .iter()
            .all(|span| !span.style.add_modifier.contains(Modifier::ITALIC)));
    }

    #[test]
    fn unknown_tags_are_literal() {
        let spans = to_spans("<x>hi</x>");
        assert_eq!(text(&spans), "<x>hi</x>");
    }
}
