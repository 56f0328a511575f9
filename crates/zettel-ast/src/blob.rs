//! Text encoding of BLOB payloads.
//!
//! SVG payloads are stored as the text they already are. Everything else is
//! standard Base64 with padding.

const SYNTAX_SVG: &str = "svg";

const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encodes `data` for the content slot of a BLOB with the given syntax.
///
/// SVG is stored as text and must be UTF-8: invalid sequences are replaced
/// by `U+FFFD` and do not survive [`decode_binary`]. Every other syntax is
/// Base64 and round-trips any bytes.
pub fn encode_binary(syntax: &str, data: &[u8]) -> String {
    if syntax == SYNTAX_SVG {
        return String::from_utf8_lossy(data).into_owned();
    }
    base64_encode(data)
}

/// Decodes the content slot of a BLOB. Malformed Base64 yields no bytes.
pub fn decode_binary(syntax: &str, content: &str) -> Vec<u8> {
    if syntax == SYNTAX_SVG {
        return content.as_bytes().to_vec();
    }
    match base64_decode(content) {
        Some(data) => data,
        None => {
            tracing::debug!(syntax, len = content.len(), "invalid base64 BLOB content");
            Vec::new()
        }
    }
}

fn base64_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let mut buf = [0u8; 3];
        buf[..chunk.len()].copy_from_slice(chunk);

        result.push(CHARS[(buf[0] >> 2) as usize] as char);
        result.push(CHARS[(((buf[0] & 0x03) << 4) | (buf[1] >> 4)) as usize] as char);
        result.push(if chunk.len() > 1 {
            CHARS[(((buf[1] & 0x0f) << 2) | (buf[2] >> 6)) as usize] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            CHARS[(buf[2] & 0x3f) as usize] as char
        } else {
            '='
        });
    }

    result
}

fn sextet(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

// Line breaks are ignored, as produced by wrapping encoders.
fn base64_decode(content: &str) -> Option<Vec<u8>> {
    let bytes: Vec<u8> = content
        .bytes()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .collect();
    if bytes.len() % 4 != 0 {
        return None;
    }

    let mut result = Vec::with_capacity(bytes.len() / 4 * 3);
    let quads = bytes.len() / 4;
    for (i, quad) in bytes.chunks(4).enumerate() {
        let padding = quad.iter().rev().take_while(|&&b| b == b'=').count();
        if padding > 2 || (padding > 0 && i + 1 != quads) {
            return None;
        }
        let mut buf = [0u8; 4];
        for (slot, &byte) in buf.iter_mut().zip(&quad[..4 - padding]) {
            *slot = sextet(byte)?;
        }

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if padding < 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if padding < 1 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}
