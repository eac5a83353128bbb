use std::fmt;

/// The 4-byte discriminator that identifies a table type on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn new(bytes: [u8; 4]) -> Tag {
        Tag(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Parse a tag from text. Returns `None` unless `text` is exactly 4 bytes.
    pub fn parse(text: &str) -> Option<Tag> {
        let bytes: [u8; 4] = text.as_bytes().try_into().ok()?;
        Some(Tag(bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", String::from_utf8_lossy(&self.0))
    }
}

#[test]
fn parse_tag() {
    assert_eq!(Tag::parse("PETT"), Some(Tag::new(*b"PETT")));
    assert_eq!(Tag::parse("PET"), None);
    assert_eq!(Tag::parse("PETTT"), None);
    assert_eq!(Tag::new(*b"NODE").to_string(), "NODE");
    assert_eq!(format!("{:?}", Tag::new(*b"NODE")), "Tag(\"NODE\")");
}
