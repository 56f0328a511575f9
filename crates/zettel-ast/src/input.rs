//! A character cursor over UTF-8 source bytes.

/// Cursor over source bytes.
///
/// The current character is available through [`Input::ch`]; it is `None`
/// at the end of the source. Bytes that are not valid UTF-8 read as
/// `U+FFFD`, one byte at a time.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    src: &'a [u8],
    pos: usize,
    next_pos: usize,
    ch: Option<char>,
}

fn decode(src: &[u8], pos: usize) -> (Option<char>, usize) {
    if pos >= src.len() {
        return (None, 0);
    }
    let chunk = &src[pos..src.len().min(pos + 4)];
    let valid = match std::str::from_utf8(chunk) {
        Ok(s) => s,
        Err(err) if err.valid_up_to() > 0 => {
            // The prefix is valid by construction.
            std::str::from_utf8(&chunk[..err.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return (Some(char::REPLACEMENT_CHARACTER), 1),
    };
    match valid.chars().next() {
        Some(ch) => (Some(ch), ch.len_utf8()),
        None => (Some(char::REPLACEMENT_CHARACTER), 1),
    }
}

impl<'a> Input<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        let mut input = Input {
            src,
            pos: 0,
            next_pos: 0,
            ch: None,
        };
        input.set_pos(0);
        input
    }

    /// The current character.
    pub fn ch(&self) -> Option<char> {
        self.ch
    }

    /// Byte offset of the current character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves to byte offset `pos` and reads the character there.
    pub fn set_pos(&mut self, pos: usize) {
        let (ch, len) = decode(self.src, pos);
        self.pos = pos.min(self.src.len());
        self.next_pos = self.pos + len;
        self.ch = ch;
    }

    /// Advances to the next character and returns it.
    pub fn next(&mut self) -> Option<char> {
        if self.ch.is_some() {
            self.set_pos(self.next_pos);
        }
        self.ch
    }

    /// The character after the current one, without advancing.
    pub fn peek(&self) -> Option<char> {
        if self.ch.is_none() {
            return None;
        }
        decode(self.src, self.next_pos).0
    }

    /// Returns true if the current character is a space, see [`is_space`].
    pub fn is_space(&self) -> bool {
        self.ch.is_some_and(is_space)
    }

    /// The source between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.src[start.min(self.pos)..self.pos]
    }
}

/// Space within a line: blank and tab, but never a line ending.
pub fn is_space(ch: char) -> bool {
    match ch {
        ' ' | '\t' => true,
        '\n' | '\r' => false,
        ch => ch.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_characters() {
        let mut input = Input::new("aä€😀".as_bytes());
        assert_eq!((input.ch(), input.pos()), (Some('a'), 0));
        assert_eq!(input.peek(), Some('ä'));
        assert_eq!(input.next(), Some('ä'));
        assert_eq!(input.pos(), 1);
        assert_eq!(input.next(), Some('€'));
        assert_eq!(input.pos(), 3);
        assert_eq!(input.next(), Some('😀'));
        assert_eq!(input.pos(), 6);
        assert_eq!(input.next(), None);
        assert_eq!(input.pos(), 10);
        assert_eq!(input.next(), None);
        assert_eq!(input.peek(), None);
        assert_eq!(input.slice_from(3), "€😀".as_bytes());
    }

    #[test]
    fn test_empty_input() {
        let mut input = Input::new(b"");
        assert_eq!(input.ch(), None);
        assert_eq!(input.next(), None);
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn test_invalid_bytes() {
        let mut input = Input::new(&[b'a', 0xff, 0xe2, 0x82, b'b']);
        assert_eq!(input.next(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(input.next(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(input.pos(), 2);
        assert_eq!(input.next(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(input.next(), Some('b'));
        assert_eq!(input.pos(), 4);
    }

    #[test]
    fn test_set_pos() {
        let mut input = Input::new(b"abc");
        input.next();
        input.next();
        input.set_pos(0);
        assert_eq!(input.ch(), Some('a'));
        input.set_pos(99);
        assert_eq!((input.ch(), input.pos()), (None, 3));
    }

    #[test]
    fn test_is_space() {
        assert!(is_space(' '));
        assert!(is_space('\t'));
        assert!(is_space('\u{a0}'));
        assert!(!is_space('\n'));
        assert!(!is_space('\r'));
        assert!(!is_space('x'));
        assert!(Input::new(b" x").is_space());
        assert!(!Input::new(b"").is_space());
    }
}
