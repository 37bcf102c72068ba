use crate::{count_lines, Position};

/// Cursor over a borrowed XML buffer, persisted across [`Scanner::parse_next`] calls.
///
/// The buffer is never written to, so any number of states may share it.
/// The cursor only moves when a scan succeeds.
///
/// [`Scanner::parse_next`]: crate::Scanner::parse_next
#[derive(Debug, Clone)]
pub struct ParseState<'src> {
    buffer: &'src [u8],
    offset: usize,
    line: usize,
}

impl<'src> ParseState<'src> {
    /// Starts at offset 0, line 1.
    pub const fn new(buffer: &'src [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            line: 1,
        }
    }

    /// Like [`ParseState::new`], but steps over a leading UTF-8 byte order mark.
    pub fn with_bom(buffer: &'src [u8]) -> Self {
        let mut state = Self::new(buffer);
        if buffer.starts_with(b"\xEF\xBB\xBF") {
            state.offset = 3;
        }
        state
    }

    /// The whole buffer, including the part already consumed.
    pub const fn buffer(&self) -> &'src [u8] {
        self.buffer
    }

    /// Gets the byte offset from the start of the buffer.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Gets the 1-based line the cursor is on.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Snapshot of the cursor.
    pub const fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
        }
    }

    /// Moves the cursor back (or forward) to a snapshot previously taken from this buffer.
    ///
    /// Offsets past the end of the buffer are clamped to it.
    pub fn rewind(&mut self, to: Position) {
        self.offset = to.offset.min(self.buffer.len());
        self.line = to.line.max(1);
    }

    /// Whether everything has been consumed.
    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'src [u8] {
        self.buffer.get(self.offset..).unwrap_or(&[])
    }

    pub(crate) fn cursor(&self) -> Cursor<'src> {
        Cursor {
            buffer: self.buffer,
            offset: self.offset,
            line: self.line,
        }
    }

    pub(crate) fn commit(&mut self, cursor: Cursor<'src>) {
        debug_assert!(cursor.offset <= self.buffer.len());
        self.offset = cursor.offset;
        self.line = cursor.line;
    }
}

/// Scratch copy of a [`ParseState`] used during a single scan.
///
/// Everything here keeps `line` in step with the newlines stepped over.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'src> {
    buffer: &'src [u8],
    offset: usize,
    line: usize,
}

impl<'src> Cursor<'src> {
    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.buffer.get(self.offset).copied()
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
        }
    }

    #[inline]
    pub(crate) fn rest(&self) -> &'src [u8] {
        self.buffer.get(self.offset..).unwrap_or(&[])
    }

    #[inline]
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'src [u8] {
        &self.buffer[start..end]
    }

    /// From `start` to the end of the buffer.
    #[inline]
    pub(crate) fn tail(&self, start: usize) -> &'src [u8] {
        &self.buffer[start..]
    }

    /// From `start` up to the cursor.
    #[inline]
    pub(crate) fn since(&self, start: usize) -> &'src [u8] {
        &self.buffer[start..self.offset]
    }

    /// Steps over one byte that is known not to be `\n`.
    #[inline]
    pub(crate) fn bump(&mut self) {
        debug_assert!(self.peek().map_or(false, |ch| ch != b'\n'));
        self.offset += 1;
    }

    /// Moves to `target`, counting the newlines in between.
    pub(crate) fn advance_to(&mut self, target: usize) {
        debug_assert!(self.offset <= target && target <= self.buffer.len());
        self.line += count_lines(&self.buffer[self.offset..target]);
        self.offset = target;
    }

    /// Skips space, CR, tab and newline.
    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                b'\n' => self.line += 1,
                b' ' | b'\r' | b'\t' => {},
                _ => break,
            }
            self.offset += 1;
        }
    }

    /// Skips bytes while `pred` holds. `pred` must reject `\n`.
    pub(crate) fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            debug_assert_ne!(ch, b'\n');
            self.offset += 1;
        }
    }
}

/// Re-encodes UTF-16LE input as UTF-8.
///
/// Input is treated as UTF-16LE when it starts with the `FF FE` byte order mark
/// (which is dropped) or with `<` followed by a zero byte.
/// Anything else returns `None` and should be scanned as-is.
/// Unpaired surrogates become U+FFFD and a trailing odd byte is ignored.
pub fn transcode_utf16le(input: &[u8]) -> Option<Vec<u8>> {
    let units = if input.starts_with(b"\xFF\xFE") {
        &input[2..]
    } else if input.starts_with(b"<\0") {
        input
    } else {
        return None;
    };

    let wide = units
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    let mut out = Vec::with_capacity(units.len() / 2);
    let mut buf = [0u8; 4];
    for ch in std::char::decode_utf16(wide) {
        let ch = ch.unwrap_or(std::char::REPLACEMENT_CHARACTER);
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_is_skipped() {
        let state = ParseState::with_bom(b"\xEF\xBB\xBF<a/>");
        assert_eq!(state.offset(), 3);
        assert_eq!(state.line(), 1);
        assert_eq!(state.remaining(), b"<a/>");

        let state = ParseState::with_bom(b"<a/>");
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn cursor_counts_lines() {
        let state = ParseState::new(b" \n\t\r\nx\ny");
        let mut cur = state.cursor();
        cur.skip_whitespace();
        assert_eq!(cur.position(), Position { offset: 5, line: 3 });
        cur.advance_to(7);
        assert_eq!(cur.position(), Position { offset: 7, line: 4 });
        assert_eq!(cur.peek(), Some(b'y'));
    }

    #[test]
    fn rewind_clamps() {
        let mut state = ParseState::new(b"abc");
        state.rewind(Position { offset: 10, line: 0 });
        assert_eq!(state.offset(), 3);
        assert_eq!(state.line(), 1);
        assert!(state.is_eof());
        assert!(state.remaining().is_empty());
    }

    #[test]
    fn utf16_with_bom() {
        let input = b"\xFF\xFE<\0a\0/\0>\0\xE9\0";
        assert_eq!(transcode_utf16le(input).unwrap(), "<a/>\u{e9}".as_bytes());
    }

    #[test]
    fn utf16_without_bom() {
        assert_eq!(transcode_utf16le(b"<\0b\0>\0").unwrap(), b"<b>");
    }

    #[test]
    fn utf16_lone_surrogate() {
        assert_eq!(
            transcode_utf16le(b"<\0\x00\xD8").unwrap(),
            "<\u{fffd}".as_bytes()
        );
    }

    #[test]
    fn utf8_is_left_alone() {
        assert!(transcode_utf16le(b"<a/>").is_none());
        assert!(transcode_utf16le(b"").is_none());
    }
}
