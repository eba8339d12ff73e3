//! Renders a merged block tree ([`crate::tree::BlockNode`]) into HTML
//! markup. Rendering is a pure mapping over the closed payload union; block
//! kinds the renderer doesn't know become a visible placeholder carrying
//! the literal type tag rather than an error.
//!
//! The writer plumbing follows [`pulldown_cmark::escape`]: everything is
//! generic over [`StrWrite`] and escapes through [`escape_html`] /
//! [`escape_href`].

use crate::block::{ListKind, Payload, Text};
use crate::text::RichText;
use crate::tree::BlockNode;
use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::io;

/// Renders a sequence of top-level nodes into a single HTML string.
pub fn render_blocks(nodes: &[BlockNode]) -> io::Result<String> {
    let mut out = String::new();
    for node in nodes {
        render_node(&mut out, node)?;
    }
    Ok(out)
}

/// Renders rich-text spans into a single HTML string, e.g. for the post
/// heading.
pub fn render_rich_text(spans: &[RichText]) -> io::Result<String> {
    let mut out = String::new();
    render_spans(&mut out, spans)?;
    Ok(out)
}

fn render_node<W: StrWrite>(w: &mut W, node: &BlockNode) -> io::Result<()> {
    match &node.block.payload {
        Payload::Paragraph(text) => render_wrapped(w, "p", text),
        Payload::Heading1(text) => render_wrapped(w, "h1", text),
        Payload::Heading2(text) => render_wrapped(w, "h2", text),
        Payload::Heading3(text) => render_wrapped(w, "h3", text),
        Payload::BulletedListItem(text) => render_list(w, node, ListKind::Bulleted, text),
        Payload::NumberedListItem(text) => render_list(w, node, ListKind::Numbered, text),
        Payload::ToDo(to_do) => {
            w.write_str(r#"<div><label for=""#)?;
            escape_html(&mut *w, &node.block.id)?;
            w.write_str(r#""><input type="checkbox" id=""#)?;
            escape_html(&mut *w, &node.block.id)?;
            w.write_str(r#"" disabled="""#)?;
            if to_do.checked {
                w.write_str(r#" checked="""#)?;
            }
            w.write_str(" /> ")?;
            render_spans(&mut *w, &to_do.rich_text)?;
            w.write_str("</label></div>")
        }
        Payload::Toggle(text) => {
            w.write_str("<details><summary>")?;
            render_spans(&mut *w, &text.rich_text)?;
            w.write_str("</summary>")?;
            render_children(&mut *w, &node.children)?;
            w.write_str("</details>")
        }
        Payload::ChildPage(child_page) => {
            w.write_str("<p>")?;
            escape_html(&mut *w, &child_page.title)?;
            w.write_str("</p>")
        }
        Payload::Divider => w.write_str("<hr />"),
        // Quote and code intentionally render only the first span; the
        // original renderer indexes `rich_text[0]` and published pages
        // depend on that output.
        Payload::Quote(text) => {
            w.write_str("<blockquote>")?;
            if let Some(span) = text.rich_text.first() {
                escape_html(&mut *w, &span.plain_text)?;
            }
            w.write_str("</blockquote>")
        }
        Payload::Code(text) => {
            w.write_str("<pre><code>")?;
            if let Some(span) = text.rich_text.first() {
                escape_html(&mut *w, &span.plain_text)?;
            }
            w.write_str("</code></pre>")
        }
        Payload::Bookmark(bookmark) => {
            w.write_str(r#"<a href=""#)?;
            escape_href(&mut *w, &bookmark.url)?;
            w.write_str(r#"" target="_blank" class="bookmark">"#)?;
            escape_html(&mut *w, &bookmark.url)?;
            w.write_str("</a>")
        }
        Payload::Other(kind) => {
            w.write_str(r#"<p class="unsupported">❌ Unsupported block ("#)?;
            match kind.as_str() {
                "unsupported" => w.write_str("unsupported by the Notion API")?,
                _ => escape_html(&mut *w, kind)?,
            }
            w.write_str(")</p>")
        }
    }
}

fn render_wrapped<W: StrWrite>(w: &mut W, tag: &str, text: &Text) -> io::Result<()> {
    write!(w, "<{}>", tag)?;
    render_spans(&mut *w, &text.rich_text)?;
    write!(w, "</{}>", tag)
}

/// Emits one list container holding the head item, its children, and every
/// run sibling. A run sibling contributes an `<li>` only if its payload is
/// the exact same list-item kind; its children render either way.
fn render_list<W: StrWrite>(
    w: &mut W,
    node: &BlockNode,
    kind: ListKind,
    text: &Text,
) -> io::Result<()> {
    w.write_str(match kind {
        ListKind::Bulleted => "<ul>",
        ListKind::Numbered => "<ol>",
    })?;
    render_item(&mut *w, text)?;
    render_children(&mut *w, &node.children)?;
    for sibling in &node.run {
        if let Some(text) = sibling.block.payload.list_text(kind) {
            render_item(&mut *w, text)?;
        }
        render_children(&mut *w, &sibling.children)?;
    }
    w.write_str(match kind {
        ListKind::Bulleted => "</ul>",
        ListKind::Numbered => "</ol>",
    })
}

fn render_item<W: StrWrite>(w: &mut W, text: &Text) -> io::Result<()> {
    w.write_str("<li>")?;
    render_spans(&mut *w, &text.rich_text)?;
    w.write_str("</li>")
}

fn render_children<W: StrWrite>(w: &mut W, children: &[BlockNode]) -> io::Result<()> {
    for child in children {
        render_node(&mut *w, child)?;
    }
    Ok(())
}

fn render_spans<W: StrWrite>(w: &mut W, spans: &[RichText]) -> io::Result<()> {
    for span in spans {
        render_span(&mut *w, span)?;
    }
    Ok(())
}

fn render_span<W: StrWrite>(w: &mut W, span: &RichText) -> io::Result<()> {
    let annotations = &span.annotations;
    let mut classes: Vec<&str> = Vec::new();
    if annotations.bold {
        classes.push("bold");
    }
    if annotations.code {
        classes.push("code");
    }
    if annotations.italic {
        classes.push("italic");
    }
    if annotations.strikethrough {
        classes.push("strikethrough");
    }
    if annotations.underline {
        classes.push("underline");
    }

    w.write_str("<span")?;
    if !classes.is_empty() {
        write!(w, r#" class="{}""#, classes.join(" "))?;
    }
    if let Some(color) = annotations.color() {
        w.write_str(r#" style="color: "#)?;
        escape_html(&mut *w, color)?;
        w.write_str(r#"""#)?;
    }
    w.write_str(">")?;
    match &span.href {
        Some(href) => {
            w.write_str(r#"<a href=""#)?;
            escape_href(&mut *w, href)?;
            w.write_str(r#"">"#)?;
            escape_html(&mut *w, &span.plain_text)?;
            w.write_str("</a>")?;
        }
        None => escape_html(&mut *w, &span.plain_text)?,
    }
    w.write_str("</span>")
}
