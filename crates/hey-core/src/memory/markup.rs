#![forbid(unsafe_code)]

//! Fragment markup parsing and escaping for [`MemoryDom`](super::MemoryDom).
//!
//! This is a forgiving fragment parser, not an HTML5 tree builder: unknown
//! closing tags are ignored, unclosed elements are closed at end of input,
//! and comments are dropped.

/// Parsed markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fragment {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// An element whose closing tag has not been seen: (tag, attributes, children).
type Open = (String, Vec<(String, String)>, Vec<Fragment>);

/// Parse a markup fragment into a forest.
pub(crate) fn parse(input: &str) -> Vec<Fragment> {
    let mut stack: Vec<Open> = Vec::new();
    let mut roots: Vec<Fragment> = Vec::new();
    let mut rest = input;

    fn push(stack: &mut [Open], roots: &mut Vec<Fragment>, node: Fragment) {
        match stack.last_mut() {
            Some((_, _, children)) => children.push(node),
            None => roots.push(node),
        }
    }

    fn close_top(stack: &mut Vec<Open>, roots: &mut Vec<Fragment>) {
        if let Some((tag, attributes, children)) = stack.pop() {
            push(stack, roots, Fragment::Element { tag, attributes, children });
        }
    }

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");
            if let Some(depth) = stack.iter().rposition(|(tag, _, _)| *tag == name) {
                while stack.len() > depth {
                    close_top(&mut stack, &mut roots);
                }
            }
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (tag, attributes, self_closing, remaining) = parse_open_tag(&rest[1..]);
            rest = remaining;
            if self_closing || is_void(&tag) {
                push(
                    &mut stack,
                    &mut roots,
                    Fragment::Element { tag, attributes, children: Vec::new() },
                );
            } else {
                stack.push((tag, attributes, Vec::new()));
            }
        } else {
            // Text runs to the next tag start (a lone '<' is literal text).
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
            push(&mut stack, &mut roots, Fragment::Text(decode(&rest[..end])));
            rest = &rest[end..];
        }
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

/// Parse `name attr=... >` (input starts right after `<`).
fn parse_open_tag(input: &str) -> (String, Vec<(String, String)>, bool, &str) {
    let name_end = input
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(input.len());
    let tag = input[..name_end].to_ascii_lowercase();
    let mut rest = &input[name_end..];
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            self_closing = true;
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }
        if rest.is_empty() {
            break;
        }
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();
        let value = if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    rest = body.get(end + 1..).unwrap_or("");
                    decode(&body[..end])
                }
                _ => {
                    let end = after
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(after.len());
                    rest = &after[end..];
                    decode(&after[..end])
                }
            }
        } else {
            String::new()
        };
        if !name.is_empty() && !attributes.iter().any(|(n, _): &(String, String)| *n == name) {
            attributes.push((name, value));
        }
    }
    (tag, attributes, self_closing, rest)
}

fn decode(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub(crate) fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub(crate) fn escape_attribute(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;")
}
