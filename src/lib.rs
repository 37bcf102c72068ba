//! *xmlscan* pulls XML-ish input apart one piece at a time:
//! a tag, a comment, or a run of text per call, with no lookahead beyond the raw bytes.
//!
//! # Example
//! ```rust
//! use xmlscan::{Node, ParseState, Scanner};
//!
//! let mut state = ParseState::new(b"<greeting lang=\"en\">hello, world!</greeting>");
//! let mut scanner = Scanner::new();
//!
//! let tag = match scanner.parse_next(&mut state)? {
//!     Node::Tag(tag) => tag,
//!     other => panic!("expected a tag, got {:?}", other),
//! };
//! assert_eq!(tag.name(), b"greeting");
//! assert_eq!(tag.get("lang"), Some(&b"en"[..]));
//! assert_eq!(state.offset(), 20);
//! # Ok::<(), xmlscan::Error>(())
//! ```
//!
//! Or, to just walk a whole document, use a [`Reader`]:
//!
//! ```rust
//! for node in xmlscan::Reader::from_str("<Test>hello, world!</Test>") {
//!     println!("Node: {:?}", node);
//! }
//! ```
//!
//! # What it does (and doesn't)
//! Every call to [`Scanner::parse_next`] consumes exactly one unit and moves the
//! [`ParseState`] cursor past it, keeping a line counter for error messages.
//! Tag names are taken as-is (closing tags keep their `/`, so `</a>` is named `/a`),
//! attribute values may be double quoted, single quoted, unquoted or missing entirely
//! (`<input disabled>` sets `disabled` to `disabled`),
//! and `?` is allowed anywhere inside `<?processing instructions?>`.
//!
//! Nothing is validated beyond what's needed to find where things start and end:
//! no DTDs, no namespaces, no matching of open and close tags.
//! Malformed input is an [`Error`] and the cursor stays where it was.
//!
//! What a tag, comment or text node *is* is up to a [`NodeFactory`];
//! the default one builds the [`Tag`], [`Comment`] and [`Text`] types in this crate.
//! Escapes like `&lt;` are handled by an [`EntityDecoder`], by default [`XmlEntities`].
//!
//! # Features
//! - `use-memchr` (default): byte searches go through the [`memchr`](https://crates.io/crates/memchr) crate.

mod entities;
mod factory;
mod node;
mod reader;
mod scanner;
mod state;

pub use entities::{EntityDecoder, Verbatim, XmlEntities};
pub use factory::{NodeFactory, Nodes, TagBuilder};
pub use node::{Attributes, Comment, Node, Tag, Text};
pub use reader::Reader;
pub use scanner::{parse_next, NodeOf, Scanner};
pub use state::{transcode_utf16le, ParseState};

use std::fmt;

#[cfg(feature = "use-memchr")]
pub(crate) use memchr::memchr;
#[cfg(not(feature = "use-memchr"))]
pub(crate) fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&x| x == needle)
}

#[cfg(feature = "use-memchr")]
pub(crate) fn memmem(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    memchr::memmem::find(haystack, needle)
}
#[cfg(not(feature = "use-memchr"))]
pub(crate) fn memmem(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(feature = "use-memchr")]
pub(crate) fn count_lines(s: &[u8]) -> usize {
    memchr::memchr_iter(b'\n', s).count()
}
#[cfg(not(feature = "use-memchr"))]
pub(crate) fn count_lines(s: &[u8]) -> usize {
    s.iter().filter(|&&ch| ch == b'\n').count()
}

/// A cursor snapshot: byte offset and 1-based line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, offset {}", self.line, self.offset)
    }
}

/// Errors emitted by [`Scanner::parse_next`] and [`Reader`].
///
/// Tag and attribute names are lossily converted to UTF-8 for the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `<!--` was never followed by `-->`. Position is that of the `<`.
    ///
    /// Examples: `<!--`, `<!-- a -- >`, `<!--->`.
    #[error("unterminated comment at {position}")]
    UnterminatedComment { position: Position },

    /// A `/` inside a tag wasn't followed by `>`. Position is that of the offending byte.
    ///
    /// Examples: `<a / b>`, `<a/`, `<a/=>`.
    #[error("expected /> in <{tag} at {position}")]
    UnclosedSelfCloseMarker { tag: String, position: Position },

    /// A `?` inside a tag whose name doesn't start with `?`. Position is that of the `?`.
    ///
    /// Examples: `<a?>`, `<a b="c"?>`.
    #[error("invalid '?' in <{tag} at {position}")]
    UnexpectedProcessingInstructionMarker { tag: String, position: Position },

    /// Something other than a letter where an attribute should start.
    ///
    /// Examples: `<a 1="2">`, `<a ="b">`, `<a b="c""d">`.
    #[error("invalid attribute for <{tag} (unexpected byte {byte:#04x}) at {position}")]
    InvalidAttributeStartByte {
        tag: String,
        byte: u8,
        position: Position,
    },

    /// Input ended inside a quoted attribute value. Position is that of the opening quote.
    ///
    /// Examples: `<a b="c`, `<a b='c">`.
    #[error("unclosed quote in <{tag} {attribute}= at {position}")]
    UnclosedQuotedValue {
        tag: String,
        attribute: String,
        position: Position,
    },

    /// Input ended before the tag's `>`. Position is that of the `<`.
    ///
    /// Examples: `<a`, `<a b="c"`, `<a b`, and a lone `<` (with an empty `tag`).
    #[error("unclosed tag <{tag} at {position}")]
    UnclosedTag { tag: String, position: Position },

    /// `<` with nothing that could be a name after it. Position is that of the `<`.
    ///
    /// Examples: `<>`, `< >`. Note `</>` is accepted as a tag named `/`.
    #[error("missing tag name at {position}")]
    MissingTagName { position: Position },

    /// Nothing left to scan.
    #[error("unexpected end of input at {position}")]
    UnexpectedEof { position: Position },
}

impl Error {
    /// Where the error was found.
    pub fn position(&self) -> Position {
        match *self {
            Error::UnterminatedComment { position }
            | Error::UnclosedSelfCloseMarker { position, .. }
            | Error::UnexpectedProcessingInstructionMarker { position, .. }
            | Error::InvalidAttributeStartByte { position, .. }
            | Error::UnclosedQuotedValue { position, .. }
            | Error::UnclosedTag { position, .. }
            | Error::MissingTagName { position }
            | Error::UnexpectedEof { position } => position,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
