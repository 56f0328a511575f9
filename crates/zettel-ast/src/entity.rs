//! HTML character entities in source text.

use crate::input::Input;

/// Scans an entity such as `&amp;`, `&#33;` or `&#x21;` at the current
/// position and returns its text.
///
/// Named entities must be known HTML entities. Numeric entities must not
/// denote a control character. On failure the input position is unchanged.
pub fn scan_entity(input: &mut Input<'_>) -> Option<String> {
    let start = input.pos();
    let result = scan(input);
    if result.is_none() {
        input.set_pos(start);
    }
    result
}

fn scan(input: &mut Input<'_>) -> Option<String> {
    if input.ch() != Some('&') {
        return None;
    }
    if input.next() == Some('#') {
        let radix = match input.next() {
            Some('x' | 'X') => {
                input.next();
                16
            }
            _ => 10,
        };
        let digits = scan_until_semicolon(input, |ch| ch.is_digit(radix))?;
        let code = u32::from_str_radix(&digits, radix).ok()?;
        let ch = char::from_u32(code).filter(|ch| !ch.is_control())?;
        return Some(ch.to_string());
    }

    let name = scan_until_semicolon(input, |ch| ch.is_ascii_alphanumeric())?;
    let entity = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&entity);
    if decoded == entity {
        tracing::trace!(%entity, "unknown entity");
        return None;
    }
    Some(decoded.into_owned())
}

/// Collects characters accepted by `valid` up to a terminating `;`, which is
/// consumed. At least one character is required.
fn scan_until_semicolon(input: &mut Input<'_>, valid: impl Fn(char) -> bool) -> Option<String> {
    let mut text = String::new();
    loop {
        match input.ch()? {
            ';' if !text.is_empty() => {
                input.next();
                return Some(text);
            }
            ch if valid(ch) => {
                text.push(ch);
                input.next();
            }
            _ => return None,
        }
    }
}
