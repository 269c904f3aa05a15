use common::markdown::{escape, escape_markers, render, wrap, Style};

#[test]
fn bold() {
    assert_eq!(render("**hi**"), "<b>hi</b>");
}

#[test]
fn italic_and_underline() {
    assert_eq!(render("*hi*"), "<i>hi</i>");
    assert_eq!(render("_hi_"), "<u>hi</u>");
    assert_eq!(render("a *b* and _c_"), "a <i>b</i> and <u>c</u>");
}

#[test]
fn link() {
    assert_eq!(render("[x](http://a)"), r#"<a href="http://a">x</a>"#);
    assert_eq!(
        render("see [docs](https://example.com/path) now"),
        r#"see <a href="https://example.com/path">docs</a> now"#
    );
}

#[test]
fn script_tags_are_escaped() {
    let rendered = render("<script>");
    assert_eq!(rendered, "&lt;script&gt;");
    assert!(!rendered.contains('<'));

    let rendered = render(r#"<img src=x onerror="alert(1)">"#);
    assert!(!rendered.contains('<'));
    assert!(!rendered.contains('"'));
}

#[test]
fn link_cannot_break_out_of_href() {
    let rendered = render(r#"[x](http://a" onclick="evil)"#);
    assert_eq!(
        rendered,
        r#"<a href="http://a&quot; onclick=&quot;evil">x</a>"#
    );
}

#[test]
fn unsafe_schemes_stay_literal() {
    assert_eq!(render("[x](javascript:alert(1))"), "[x](javascript:alert(1))");
}

#[test]
fn passes_are_cumulative() {
    // The bold pass runs on the link pass output, so the label gets both.
    assert_eq!(
        render("[**x**](http://a)"),
        r#"<a href="http://a"><b>x</b></a>"#
    );
    assert_eq!(render("**_x_**"), "<b><u>x</u></b>");
}

#[test]
fn unmatched_syntax_is_literal() {
    assert_eq!(render("2 * 3"), "2 * 3");
    assert_eq!(render("[label]"), "[label]");
    assert_eq!(render(""), "");
    assert_eq!(render("snake_case"), "snake_case");
}

#[test]
fn escaping() {
    assert_eq!(escape(r#"a & b < c > "d" 'e'"#), "a &amp; b &lt; c &gt; &quot;d&quot; &#39;e&#39;");
}

#[test]
fn wrapping() {
    assert_eq!(wrap("hi", Style::Bold), "**hi**");
    assert_eq!(wrap("hi", Style::Italic), "*hi*");
    assert_eq!(wrap("hi", Style::Underline), "_hi_");
    assert_eq!(render(&wrap("hi", Style::Bold)), "<b>hi</b>");
}

#[test]
fn link_urls_keep_their_markers() {
    assert_eq!(
        render("[x](http://h/my_file_v2*.png)"),
        r#"<a href="http://h/my%5Ffile%5Fv2%2A.png">x</a>"#
    );
    assert_eq!(
        render("_a_ [b](https://h/x_y_z) _c_"),
        r#"<u>a</u> <a href="https://h/x%5Fy%5Fz">b</a> <u>c</u>"#
    );
}

#[test]
fn escaped_markers_are_literal() {
    assert_eq!(escape_markers("a_b*[c]"), r"a\_b\*\[c\]");
    assert_eq!(
        render(r"\_not\_ \*em\* \[x\]"),
        "&#95;not&#95; &#42;em&#42; &#91;x&#93;"
    );
    assert_eq!(
        render(&format!("[{}](http://h/f)", escape_markers("my_file_v2.png"))),
        r#"<a href="http://h/f">my&#95;file&#95;v2.png</a>"#
    );
}
