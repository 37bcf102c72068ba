/// One unit produced by the [`Scanner`](crate::Scanner).
///
/// The type parameters are whatever the [`NodeFactory`](crate::NodeFactory) builds;
/// with the default factory they're this module's [`Tag`], [`Comment`] and [`Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<T = Tag, C = Comment, X = Text> {
    /// `<name attr="value">`, `</name>`, `<name/>` or `<?pi ...?>`.
    Tag(T),
    /// `<!-- text -->`.
    Comment(C),
    /// Anything between tags.
    Text(X),
}

impl<T, C, X> Node<T, C, X> {
    pub fn as_tag(&self) -> Option<&T> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&C> {
        match self {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&X> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Represents an XML tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    name: Vec<u8>,
    attributes: Attributes,
    self_closing: bool,
}

impl Tag {
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Gets the name of the tag this instance represents.
    ///
    /// This **does** include the `/` in `</End>` and the `?` in `<?xml ?>`.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Shorthand for `self.attributes().get(key)`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&[u8]> {
        self.attributes.get(key)
    }

    /// Whether this was written as `<Empty />`.
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Whether this is a `</End>` tag.
    pub fn is_closing(&self) -> bool {
        self.name.first() == Some(&b'/')
    }

    pub fn is_processing_instruction(&self) -> bool {
        self.name.first() == Some(&b'?')
    }

    pub(crate) fn mark_self_closing(&mut self) {
        self.self_closing = true;
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Decoded attributes of a [`Tag`], in source order.
///
/// Setting a key that's already present replaces its value but keeps its place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Attributes {
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&[u8]> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) {
        match self.entries.iter_mut().find(|(k, _)| k.as_slice() == key) {
            Some((_, old)) => *old = value,
            None => self.entries.push((key.to_vec(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, value)` pairs in the order they first appeared.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

/// Represents an XML comment, as written (no decoding, no trimming).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    text: Vec<u8>,
}

impl Comment {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }
}

/// Represents arbitrary text inside or outside of elements, entities decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    content: Vec<u8>,
}

impl Text {
    #[inline]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Whether the text is nothing but ASCII whitespace, as found between most tags.
    pub fn is_blank(&self) -> bool {
        self.content.iter().all(u8::is_ascii_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_first_position() {
        let mut attrs = Attributes::default();
        attrs.insert(b"a", b"1".to_vec());
        attrs.insert(b"b", b"2".to_vec());
        attrs.insert(b"a", b"3".to_vec());

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("a"), Some(&b"3"[..]));
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, [&b"a"[..], &b"b"[..]]);
    }

    #[test]
    fn tag_kinds() {
        assert!(Tag::new("/a").is_closing());
        assert!(!Tag::new("a").is_closing());
        assert!(Tag::new("?xml").is_processing_instruction());
        assert!(!Tag::new("").is_processing_instruction());
    }

    #[test]
    fn blank_text() {
        assert!(Text::new(" \r\n\t").is_blank());
        assert!(Text::new("").is_blank());
        assert!(!Text::new(" x ").is_blank());
    }
}
