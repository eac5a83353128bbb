// Code generated by kserial. DO NOT EDIT.

use kserial::runtime as ks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Kind {
    #[default]
    Cat = 0,
    Dog = 1,
    Parrot = 2,
}

impl ::core::convert::TryFrom<u8> for Kind {
    type Error = ks::DecodeError;

    fn try_from(value: u8) -> ::core::result::Result<Self, ks::DecodeError> {
        match value {
            0 => Ok(Kind::Cat),
            1 => Ok(Kind::Dog),
            2 => Ok(Kind::Parrot),
            _ => Err(ks::DecodeError::InvalidEnumValue { name: "Kind", value: value as i64 }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum Rating {
    #[default]
    Low = 0,
    Medium = 1,
    High = 2,
}

impl ::core::convert::TryFrom<i16> for Rating {
    type Error = ks::DecodeError;

    fn try_from(value: i16) -> ::core::result::Result<Self, ks::DecodeError> {
        match value {
            0 => Ok(Rating::Low),
            1 => Ok(Rating::Medium),
            2 => Ok(Rating::High),
            _ => Err(ks::DecodeError::InvalidEnumValue { name: "Rating", value: value as i64 }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pet {
    pub name: ::std::string::String,
    pub kind: Kind,
    pub tame: bool,
    pub age: u16,
    pub vaccinated: bool,
}

impl ks::Table for Pet {
    const TAG: ks::Tag = ks::Tag::new(*b"PETT");

    fn serialize_length(&self) -> usize {
        8 + ks::string_length(&self.name)
    }

    fn serialize(&self, dest: &mut [u8]) -> usize {
        let mut offset = 8;
        offset += ks::serialize_string(dest, 0, offset, &self.name);
        ks::serialize_u8(dest, 4, self.kind as u8);
        ks::serialize_u16(dest, 5, self.age);
        ks::serialize_u8(dest, 7, (self.tame as u8) | ((self.vaccinated as u8) << 1));
        offset
    }

    fn deserialize(src: &[u8], _registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {
        let bools0 = ks::deserialize_u8(src, 7)?;
        Ok(Pet {
            name: ks::deserialize_string(src, 0)?,
            kind: <Kind as ::core::convert::TryFrom<u8>>::try_from(ks::deserialize_u8(src, 4)?)?,
            tame: bools0 & 1 != 0,
            age: ks::deserialize_u16(src, 5)?,
            vaccinated: (bools0 >> 1) & 1 != 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Owner {
    pub id: u32,
    pub name: ::std::string::String,
    pub pets: ::std::vec::Vec<Pet>,
    pub favorite: ::core::option::Option<::std::boxed::Box<Pet>>,
    pub rating: Rating,
    pub verified: bool,
    pub note: ::core::option::Option<ks::AnyTable>,
}

impl ks::Table for Owner {
    const TAG: ks::Tag = ks::Tag::new(*b"OWNR");

    fn serialize_length(&self) -> usize {
        23 + ks::string_length(&self.name) + ks::sub_array_length(&self.pets) + ks::sub_length(self.favorite.as_deref()) + ks::any_length(self.note.as_ref())
    }

    fn serialize(&self, dest: &mut [u8]) -> usize {
        let mut offset = 23;
        ks::serialize_u32(dest, 0, self.id);
        offset += ks::serialize_string(dest, 4, offset, &self.name);
        offset += ks::serialize_sub_array(dest, 8, offset, &self.pets);
        offset += ks::serialize_sub(dest, 12, offset, self.favorite.as_deref());
        ks::serialize_i16(dest, 16, self.rating as i16);
        offset += ks::serialize_any(dest, 18, offset, self.note.as_ref());
        ks::serialize_u8(dest, 22, self.verified as u8);
        offset
    }

    fn deserialize(src: &[u8], registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {
        let bools0 = ks::deserialize_u8(src, 22)?;
        Ok(Owner {
            id: ks::deserialize_u32(src, 0)?,
            name: ks::deserialize_string(src, 4)?,
            pets: ks::deserialize_sub_array::<Pet>(src, 8, registry)?,
            favorite: ks::deserialize_sub::<Pet>(src, 12, registry)?.map(::std::boxed::Box::new),
            rating: <Rating as ::core::convert::TryFrom<i16>>::try_from(ks::deserialize_i16(src, 16)?)?,
            verified: bools0 & 1 != 0,
            note: ks::deserialize_any(src, 18, registry)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub value: i32,
    pub next: ::core::option::Option<::std::boxed::Box<Node>>,
}

impl ks::Table for Node {
    const TAG: ks::Tag = ks::Tag::new(*b"NODE");

    fn serialize_length(&self) -> usize {
        8 + ks::sub_length(self.next.as_deref())
    }

    fn serialize(&self, dest: &mut [u8]) -> usize {
        let mut offset = 8;
        ks::serialize_i32(dest, 0, self.value);
        offset += ks::serialize_sub(dest, 4, offset, self.next.as_deref());
        offset
    }

    fn deserialize(src: &[u8], registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {
        Ok(Node {
            value: ks::deserialize_i32(src, 0)?,
            next: ks::deserialize_sub::<Node>(src, 4, registry)?.map(::std::boxed::Box::new),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum Box {
    #[default]
    String = 0,
    Vec = 1,
}

impl ::core::convert::TryFrom<u16> for Box {
    type Error = ks::DecodeError;

    fn try_from(value: u16) -> ::core::result::Result<Self, ks::DecodeError> {
        match value {
            0 => Ok(Box::String),
            1 => Ok(Box::Vec),
            _ => Err(ks::DecodeError::InvalidEnumValue { name: "Box", value: value as i64 }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Result {
    pub ok: bool,
    pub final_: bool,
    pub try_: u8,
    pub abstract_: u16,
    pub type_: ::std::string::String,
    pub kind: Box,
}

impl ks::Table for Result {
    const TAG: ks::Tag = ks::Tag::new(*b"RSLT");

    fn serialize_length(&self) -> usize {
        10 + ks::string_length(&self.type_)
    }

    fn serialize(&self, dest: &mut [u8]) -> usize {
        let mut offset = 10;
        ks::serialize_u8(dest, 0, self.try_);
        ks::serialize_u16(dest, 1, self.abstract_);
        offset += ks::serialize_string(dest, 3, offset, &self.type_);
        ks::serialize_u16(dest, 7, self.kind as u16);
        ks::serialize_u8(dest, 9, (self.ok as u8) | ((self.final_ as u8) << 1));
        offset
    }

    fn deserialize(src: &[u8], _registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {
        let bools0 = ks::deserialize_u8(src, 9)?;
        Ok(Result {
            ok: bools0 & 1 != 0,
            final_: (bools0 >> 1) & 1 != 0,
            try_: ks::deserialize_u8(src, 0)?,
            abstract_: ks::deserialize_u16(src, 1)?,
            type_: ks::deserialize_string(src, 3)?,
            kind: <Box as ::core::convert::TryFrom<u16>>::try_from(ks::deserialize_u16(src, 7)?)?,
        })
    }
}

/// Binds every table of this schema to its tag.
pub fn register_tables(registry: &mut ks::Registry) {
    registry.register::<Pet>();
    registry.register::<Owner>();
    registry.register::<Node>();
    registry.register::<Result>();
}
