//! Escaping for Telegram MarkdownV2.
//!
//! Every reserved character is prefixed with a backslash, except inside the
//! target of an inline link `[label](http(s)://target)`, which is copied as is.

const RESERVED: &[u8] = br"\.+*?()|[]{}^$-!=#_<>~";

fn is_reserved(ch: char) -> bool {
    ch.is_ascii() && RESERVED.contains(&(ch as u8))
}

fn escape_into(buf: &mut String, text: &str) {
    for ch in text.chars() {
        if is_reserved(ch) {
            buf.push('\\');
        }
        buf.push(ch);
    }
}

struct Link<'a> {
    label: &'a str,
    target: &'a str,
    tail: &'a str,
}

/// Reads `[label](http(s)://target)` from the start of `text`.
///
/// The label must be non-empty and free of brackets. The target ends at the
/// first `)` that balances the parentheses opened inside it and may not
/// contain whitespace.
fn split_link(text: &str) -> Option<Link<'_>> {
    let body = text.strip_prefix('[')?;
    let close = body.find(|c: char| c == '[' || c == ']')?;
    if close == 0 || !body[close..].starts_with(']') {
        return None;
    }
    let label = &body[..close];
    let after = body[close + 1..].strip_prefix('(')?;

    let scheme_len = if after.starts_with("https://") {
        "https://".len()
    } else if after.starts_with("http://") {
        "http://".len()
    } else {
        return None;
    };

    let mut depth = 0usize;
    for (idx, ch) in after.char_indices() {
        match ch {
            c if c.is_whitespace() => return None,
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            ')' => {
                if idx <= scheme_len {
                    return None;
                }
                return Some(Link {
                    label,
                    target: &after[..idx],
                    tail: &after[idx + 1..],
                });
            }
            _ => {}
        }
    }
    None
}

pub fn escape_markdown(input: &str) -> String {
    let mut buf = String::with_capacity(input.len() + input.len() / 4);
    let mut rest = input;

    while let Some(start) = rest.find('[') {
        let (before, candidate) = rest.split_at(start);
        escape_into(&mut buf, before);
        match split_link(candidate) {
            Some(link) => {
                buf.push('[');
                escape_into(&mut buf, link.label);
                buf.push_str("](");
                buf.push_str(link.target);
                buf.push(')');
                rest = link.tail;
            }
            None => {
                buf.push_str("\\[");
                rest = &candidate[1..];
            }
        }
    }

    escape_into(&mut buf, rest);
    buf
}
