use crate::node::{Comment, Tag, Text};
use std::borrow::Cow;

/// Builds the values the [`Scanner`](crate::Scanner) hands back.
///
/// Implement this to scan straight into your own tree types
/// (or an arena, or an interner) instead of the crate's [`Node`](crate::Node) types.
pub trait NodeFactory {
    type Tag: TagBuilder;
    type Comment;
    type Text;

    /// Called as soon as the tag name is known, before any attribute.
    fn tag(&mut self, name: &[u8]) -> Self::Tag;

    /// `text` is raw, exactly what sits between `<!--` and `-->`.
    fn comment(&mut self, text: &[u8]) -> Self::Comment;

    /// `content` has already been through the entity decoder.
    fn text(&mut self, content: Cow<'_, [u8]>) -> Self::Text;
}

/// Mutations the [`Scanner`](crate::Scanner) performs on a tag under construction.
pub trait TagBuilder {
    fn set_self_closing(&mut self);

    /// Assigns an attribute. A key seen before is overwritten.
    fn set_attribute(&mut self, name: &[u8], value: Cow<'_, [u8]>);
}

/// The default factory, producing [`Tag`], [`Comment`] and [`Text`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Nodes;

impl NodeFactory for Nodes {
    type Tag = Tag;
    type Comment = Comment;
    type Text = Text;

    fn tag(&mut self, name: &[u8]) -> Tag {
        Tag::new(name)
    }

    fn comment(&mut self, text: &[u8]) -> Comment {
        Comment::new(text)
    }

    fn text(&mut self, content: Cow<'_, [u8]>) -> Text {
        Text::new(content.into_owned())
    }
}

impl TagBuilder for Tag {
    fn set_self_closing(&mut self) {
        self.mark_self_closing();
    }

    fn set_attribute(&mut self, name: &[u8], value: Cow<'_, [u8]>) {
        self.attributes_mut().insert(name, value.into_owned());
    }
}
