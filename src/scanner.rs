use crate::{
    entities::{EntityDecoder, XmlEntities},
    factory::{NodeFactory, Nodes, TagBuilder},
    memchr, memmem,
    node::Node,
    state::{Cursor, ParseState},
    Error, Position, Result,
};
use log::{debug, trace};

/// Bytes that end a tag name or an unquoted attribute value.
#[inline]
fn is_name_end(ch: u8) -> bool {
    matches!(ch, b' ' | b'\r' | b'\t' | b'\n' | b'/' | b'>')
}

#[inline]
fn is_attribute_name(ch: u8) -> bool {
    matches!(ch, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' | b':' | b'.' | b'-')
}

fn lossy(s: &[u8]) -> String {
    String::from_utf8_lossy(s).into_owned()
}

/// The node type a [`Scanner`] with factory `F` produces.
pub type NodeOf<F> = Node<<F as NodeFactory>::Tag, <F as NodeFactory>::Comment, <F as NodeFactory>::Text>;

/// Extracts one tag, comment or text run per call from a [`ParseState`].
///
/// The scanner itself holds no position; all of that lives in the state,
/// so one scanner can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Scanner<D = XmlEntities, F = Nodes> {
    decoder: D,
    factory: F,
}

impl Scanner {
    /// Scanner decoding with [`XmlEntities`] into the crate's own [`Node`] types.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: EntityDecoder, F: NodeFactory> Scanner<D, F> {
    pub fn with(decoder: D, factory: F) -> Self {
        Self { decoder, factory }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn factory(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Consumes the next unit at the state's cursor and returns it.
    ///
    /// A `<` starts a tag or comment, which runs up to and including its `>`;
    /// anything else is text up to (not including) the next `<` or the end of input.
    /// On success the cursor sits right after what was consumed and the line counter
    /// has been advanced by every `\n` in it.
    ///
    /// On error the state is left untouched. Calling this at the end of input
    /// fails with [`Error::UnexpectedEof`].
    ///
    /// ```rust
    /// use xmlscan::{Node, ParseState, Scanner};
    ///
    /// let mut state = ParseState::new(b"<!--\nfoo-->bar");
    /// let mut scanner = Scanner::new();
    ///
    /// let node = scanner.parse_next(&mut state).unwrap();
    /// assert_eq!(node.as_comment().unwrap().text(), b"\nfoo");
    /// assert_eq!((state.offset(), state.line()), (11, 2));
    ///
    /// let node = scanner.parse_next(&mut state).unwrap();
    /// assert_eq!(node.as_text().unwrap().content(), b"bar");
    /// assert!(state.is_eof());
    /// ```
    pub fn parse_next(&mut self, state: &mut ParseState<'_>) -> Result<NodeOf<F>> {
        let mut cur = state.cursor();
        let result = match cur.peek() {
            Some(b'<') => self.scan_markup(&mut cur),
            Some(_) => Ok(self.scan_text(&mut cur)),
            None => Err(Error::UnexpectedEof {
                position: cur.position(),
            }),
        };
        match result {
            Ok(node) => {
                trace!(
                    "scanned {} bytes at {}",
                    cur.offset() - state.offset(),
                    state.position()
                );
                state.commit(cur);
                Ok(node)
            },
            Err(err) => {
                debug!("scan failed: {}", err);
                Err(err)
            },
        }
    }

    fn scan_markup(&mut self, cur: &mut Cursor<'_>) -> Result<NodeOf<F>> {
        let open = cur.position();
        cur.bump(); // `<`
        cur.skip_whitespace();

        // A leading `/` stays part of the name so `</End>` can be told apart.
        let name_start = cur.offset();
        if cur.peek() == Some(b'/') {
            cur.bump();
        }
        cur.skip_while(|ch| !is_name_end(ch));
        let name = cur.since(name_start);

        if name.starts_with(b"!--") {
            return self.scan_comment(cur, open, name_start + 3);
        }
        if name.is_empty() {
            return Err(match cur.peek() {
                None => Error::UnclosedTag {
                    tag: String::new(),
                    position: open,
                },
                Some(_) => Error::MissingTagName { position: open },
            });
        }

        let mut tag = self.factory.tag(name);
        loop {
            cur.skip_whitespace();
            match cur.peek() {
                None | Some(b'>') => break,
                Some(b'/') => {
                    // `<Empty />`, spaces allowed between `/` and `>`
                    cur.bump();
                    cur.skip_whitespace();
                    if cur.peek() != Some(b'>') {
                        return Err(Error::UnclosedSelfCloseMarker {
                            tag: lossy(name),
                            position: cur.position(),
                        });
                    }
                    tag.set_self_closing();
                },
                Some(b'?') => {
                    if name[0] != b'?' {
                        return Err(Error::UnexpectedProcessingInstructionMarker {
                            tag: lossy(name),
                            position: cur.position(),
                        });
                    }
                    cur.bump();
                },
                Some(b'a'..=b'z') | Some(b'A'..=b'Z') => self.scan_attribute(cur, name, &mut tag)?,
                Some(byte) => {
                    return Err(Error::InvalidAttributeStartByte {
                        tag: lossy(name),
                        byte,
                        position: cur.position(),
                    })
                },
            }
        }

        if cur.peek() != Some(b'>') {
            return Err(Error::UnclosedTag {
                tag: lossy(name),
                position: open,
            });
        }
        cur.bump();
        Ok(Node::Tag(tag))
    }

    /// `body_start` is right after `<!--`, the cursor is at the end of the would-be tag name.
    fn scan_comment(&mut self, cur: &mut Cursor<'_>, open: Position, body_start: usize) -> Result<NodeOf<F>> {
        let body = cur.tail(body_start);
        let len = memmem(body, b"-->").ok_or(Error::UnterminatedComment { position: open })?;
        cur.advance_to(body_start + len + 3);
        Ok(Node::Comment(self.factory.comment(&body[..len])))
    }

    fn scan_attribute(&self, cur: &mut Cursor<'_>, tag_name: &[u8], tag: &mut F::Tag) -> Result<()> {
        let start = cur.offset();
        cur.skip_while(is_attribute_name);
        let name = cur.since(start);
        cur.skip_whitespace();

        let raw = if cur.peek() == Some(b'=') {
            cur.bump();
            cur.skip_whitespace();
            match cur.peek() {
                Some(quote) if quote == b'"' || quote == b'\'' => {
                    let opening = cur.position();
                    cur.bump();
                    let value_start = cur.offset();
                    let len = memchr(quote, cur.rest()).ok_or_else(|| Error::UnclosedQuotedValue {
                        tag: lossy(tag_name),
                        attribute: lossy(name),
                        position: opening,
                    })?;
                    cur.advance_to(value_start + len);
                    cur.bump(); // closing quote
                    cur.slice(value_start, value_start + len)
                },
                _ => {
                    let value_start = cur.offset();
                    cur.skip_while(|ch| !is_name_end(ch));
                    cur.since(value_start)
                },
            }
        } else {
            // bare attribute, `<input disabled>`
            name
        };

        tag.set_attribute(name, self.decoder.decode(raw));
        Ok(())
    }

    fn scan_text(&mut self, cur: &mut Cursor<'_>) -> NodeOf<F> {
        let start = cur.offset();
        let rest = cur.rest();
        let end = start + memchr(b'<', rest).unwrap_or_else(|| rest.len());
        cur.advance_to(end);
        let raw = cur.slice(start, end);
        Node::Text(self.factory.text(self.decoder.decode(raw)))
    }
}

/// Scans the next unit with a default [`Scanner`].
pub fn parse_next(state: &mut ParseState<'_>) -> Result<Node> {
    Scanner::new().parse_next(state)
}
