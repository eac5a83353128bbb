use example_app::generated::{register_tables, Box as Shape, Kind, Node, Owner, Pet, Rating, Result as Verdict};
use kserial::{compile_schema, AnyTable, DecodeError, Registry, Table, Tag};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn registry() -> Registry {
    let mut registry = Registry::new();
    register_tables(&mut registry);
    registry
}

#[test]
fn generated_code_is_up_to_date() {
    let compiled = compile_schema(include_str!("../schema.ks")).unwrap();
    assert_eq!(compiled.output, include_str!("../src/generated.rs"));
}

#[test]
fn default_pet_layout() {
    let bytes = Pet::default().to_bytes();
    // Header: name slot, kind, age, bool chunk. Tail: empty string.
    assert_eq!(bytes, vec![8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn pet_bools_share_a_byte() {
    let pet = Pet {
        name:       String::new(),
        kind:       Kind::Parrot,
        tame:       false,
        age:        0x0102,
        vaccinated: true,
    };
    let bytes = pet.to_bytes();
    assert_eq!(&bytes[4..8], &[2, 0x02, 0x01, 0b10]);
}

#[test]
fn unknown_enum_value_is_rejected() {
    let mut bytes = Pet::default().to_bytes();
    bytes[4] = 9;
    assert_eq!(
        Pet::deserialize(&bytes, &registry()),
        Err(DecodeError::InvalidEnumValue { name: "Kind", value: 9 })
    );
}

#[test]
fn empty_owner_has_null_slots() {
    let owner = Owner::default();
    assert_eq!(owner.serialize_length(), 23 + 4 + 4);
    let bytes = owner.to_bytes();
    assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
    assert_eq!(&bytes[18..22], &[0, 0, 0, 0]);
    assert_eq!(Owner::deserialize(&bytes, &registry()), Ok(owner));
}

#[test]
fn any_field_needs_registered_tag() {
    let owner = Owner {
        note: Some(AnyTable::new(Pet::default())),
        ..Owner::default()
    };
    let bytes = owner.to_bytes();
    assert_eq!(
        Owner::deserialize(&bytes, &Registry::new()),
        Err(DecodeError::UnknownTag(Tag::new(*b"PETT")))
    );
    let decoded = Owner::deserialize(&bytes, &registry()).unwrap();
    assert_eq!(decoded.note.unwrap().downcast_ref::<Pet>(), Some(&Pet::default()));
}

#[test]
fn self_referencing_chain() {
    let mut chain = Node { value: 0, next: None };
    for value in 1..20 {
        chain = Node { value, next: Some(Box::new(chain)) };
    }
    let bytes = chain.to_bytes();
    assert_eq!(bytes.len(), 20 * 8);
    assert_eq!(Node::deserialize(&bytes, &registry()), Ok(chain));
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Cat), Just(Kind::Dog), Just(Kind::Parrot)]
}

fn rating() -> impl Strategy<Value = Rating> {
    prop_oneof![Just(Rating::Low), Just(Rating::Medium), Just(Rating::High)]
}

fn pet() -> impl Strategy<Value = Pet> {
    (".{0,12}", kind(), any::<bool>(), any::<u16>(), any::<bool>()).prop_map(|(name, kind, tame, age, vaccinated)| Pet {
        name,
        kind,
        tame,
        age,
        vaccinated,
    })
}

fn note() -> impl Strategy<Value = Option<AnyTable>> {
    prop_oneof![
        Just(None),
        pet().prop_map(|p| Some(AnyTable::new(p))),
        any::<i32>().prop_map(|value| Some(AnyTable::new(Node { value, next: None }))),
    ]
}

fn owner() -> impl Strategy<Value = Owner> {
    (
        any::<u32>(),
        ".{0,16}",
        prop::collection::vec(pet(), 0..5),
        prop::option::of(pet()),
        rating(),
        any::<bool>(),
        note(),
    )
        .prop_map(|(id, name, pets, favorite, rating, verified, note)| Owner {
            id,
            name,
            pets,
            favorite: favorite.map(Box::new),
            rating,
            verified,
            note,
        })
}

proptest! {
    #[test]
    fn owner_round_trip(owner in owner()) {
        let bytes = owner.to_bytes();
        prop_assert_eq!(bytes.len(), owner.serialize_length());
        prop_assert_eq!(Owner::deserialize(&bytes, &registry()), Ok(owner));
    }

    #[test]
    fn truncated_owner_never_panics(owner in owner(), cut in any::<prop::sample::Index>()) {
        let bytes = owner.to_bytes();
        let cut = cut.index(bytes.len());
        // A shortened buffer must decode to an error or some value, never panic.
        let _ = Owner::deserialize(&bytes[..cut], &registry());
    }
}

#[test]
fn keyword_and_prelude_names_round_trip() {
    let verdict = Verdict {
        ok:        true,
        final_:    false,
        try_:      7,
        abstract_: 0x0201,
        type_:     "pass".to_string(),
        kind:      Shape::Vec,
    };
    let bytes = verdict.to_bytes();
    assert_eq!(&bytes[..10], &[7, 0x01, 0x02, 10, 0, 0, 0, 1, 0, 0b01]);
    assert_eq!(&bytes[10..], &[4, 0, 0, 0, b'p', b'a', b's', b's']);
    assert_eq!(Verdict::deserialize(&bytes, &registry()), Ok(verdict));
    assert!(registry().lookup(Verdict::TAG).is_some());
}
