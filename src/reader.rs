use crate::{
    entities::{EntityDecoder, XmlEntities},
    factory::Nodes,
    node::Node,
    scanner::Scanner,
    state::ParseState,
    Error,
};
use std::iter::FusedIterator;

/// Walks a whole document as an [`Iterator`] of nodes, one [`Scanner::parse_next`] per item.
///
/// Iteration ends at the end of input, or right after the first error.
///
/// ```rust
/// use xmlscan::{Node, Reader};
///
/// let mut reader = Reader::from_str("<list>\n  <item id=\"1\"/>\n</list>");
/// reader.skip_blank_text(true);
///
/// let names: Vec<_> = reader
///     .filter_map(|node| match node {
///         Ok(Node::Tag(tag)) => Some(String::from_utf8_lossy(tag.name()).into_owned()),
///         _ => None,
///     })
///     .collect();
/// assert_eq!(names, ["list", "item", "/list"]);
/// ```
pub struct Reader<'xml, D = XmlEntities> {
    // State
    state: ParseState<'xml>,
    scanner: Scanner<D, Nodes>,
    failed: bool,

    // Settings
    skip_blank: bool,
}

impl<'xml> Reader<'xml> {
    /// Constructs a new [`Reader`] from ASCII-compatible XML bytes.
    pub fn from_bytes(xml: &'xml [u8]) -> Reader<'xml> {
        Self::new(ParseState::new(xml), XmlEntities)
    }

    /// Constructs a new [`Reader`] from a UTF-8 string, stripping the BOM if it's present.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'xml str) -> Reader<'xml> {
        Self::new(ParseState::with_bom(xml.as_bytes()), XmlEntities)
    }
}

impl<'xml, D: EntityDecoder> Reader<'xml, D> {
    /// Continues from wherever `state` is, decoding with `decoder`.
    pub fn new(state: ParseState<'xml>, decoder: D) -> Self {
        Reader {
            state,
            scanner: Scanner::with(decoder, Nodes),
            failed: false,

            skip_blank: false,
        }
    }

    /// Enables or disables skipping [`Text`](crate::Text) nodes made only of whitespace,
    /// like the indentation between tags.
    ///
    /// This property is dynamic and can be turned on and off while parsing.
    ///
    /// Defaults to disabled (`false`).
    pub fn skip_blank_text(&mut self, skip: bool) -> &mut Self {
        self.skip_blank = skip;
        self
    }

    /// Gets the byte offset from the start of the input.
    pub fn offset(&self) -> usize {
        self.state.offset()
    }

    /// Gets the line the reader is on, starting at 1.
    pub fn line(&self) -> usize {
        self.state.line()
    }

    pub fn state(&self) -> &ParseState<'xml> {
        &self.state
    }

    /// Gives back the state, e.g. to keep scanning by hand after an error.
    pub fn into_state(self) -> ParseState<'xml> {
        self.state
    }
}

impl<'xml, D: EntityDecoder> Iterator for Reader<'xml, D> {
    type Item = Result<Node, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && !self.state.is_eof() {
            match self.scanner.parse_next(&mut self.state) {
                Ok(Node::Text(text)) if self.skip_blank && text.is_blank() => continue,
                Ok(node) => return Some(Ok(node)),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                },
            }
        }
        None
    }
}

impl<'xml, D: EntityDecoder> FusedIterator for Reader<'xml, D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Comment, Text, Verbatim};

    #[test]
    fn whole_document() {
        let nodes: Vec<_> = Reader::from_str("<?xml version=\"1.0\"?><a>x &amp; y<!--c--></a>")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].as_tag().unwrap().get("version"), Some(&b"1.0"[..]));
        assert_eq!(nodes[2], Node::Text(Text::new("x & y")));
        assert_eq!(nodes[3], Node::Comment(Comment::new("c")));
        assert!(nodes[4].as_tag().unwrap().is_closing());
    }

    #[test]
    fn blank_text_kept_by_default() {
        let reader = Reader::from_bytes(b"<a>\n  <b/>\n</a>");
        assert_eq!(reader.count(), 5);

        let mut reader = Reader::from_bytes(b"<a>\n  <b/>\n</a>");
        reader.skip_blank_text(true);
        assert_eq!(reader.count(), 3);
    }

    #[test]
    fn stops_after_error() {
        let mut reader = Reader::from_bytes(b"text<a 1><b>");
        assert!(matches!(reader.next(), Some(Ok(Node::Text(_)))));
        assert!(matches!(
            reader.next(),
            Some(Err(Error::InvalidAttributeStartByte { byte: b'1', .. }))
        ));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        assert_eq!(reader.offset(), 4);
    }

    #[test]
    fn bom_and_lines() {
        let mut reader = Reader::from_str("\u{feff}<a>\n\n</a>");
        assert_eq!(reader.offset(), 3);
        reader.by_ref().for_each(drop);
        assert_eq!(reader.line(), 3);
        assert!(reader.state().is_eof());
    }

    #[test]
    fn custom_decoder() {
        let mut reader = Reader::new(ParseState::new(b"&lt;"), Verbatim);
        assert_eq!(reader.next().unwrap().unwrap(), Node::Text(Text::new("&lt;")));
        assert!(reader.next().is_none());
    }
}
