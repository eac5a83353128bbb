// example/src/main.rs

use example_app::generated::{register_tables, Kind, Node, Owner, Pet, Rating};
use kserial::{AnyTable, DecodeError, Registry, Table};

fn main() -> Result<(), DecodeError> {
    // The registry resolves `any` fields back to concrete records by tag.
    let mut registry = Registry::new();
    register_tables(&mut registry);

    let rex = Pet {
        name:       "Rex".to_string(),
        kind:       Kind::Dog,
        tame:       true,
        age:        4,
        vaccinated: true,
    };
    let polly = Pet {
        name: "Polly".to_string(),
        kind: Kind::Parrot,
        age:  31,
        ..Pet::default()
    };

    let chain = Node {
        value: 1,
        next:  Some(Box::new(Node { value: 2, next: None })),
    };

    let owner = Owner {
        id:       123,
        name:     "Ada".to_string(),
        pets:     vec![rex.clone(), polly],
        favorite: Some(Box::new(rex)),
        rating:   Rating::High,
        verified: true,
        note:     Some(AnyTable::new(chain)),
    };

    let bytes = owner.to_bytes();
    println!("Owner serialized to {} bytes", bytes.len());

    let decoded = Owner::deserialize(&bytes, &registry)?;
    println!("id       = {}", decoded.id);
    println!("name     = {}", decoded.name);
    println!("rating   = {:?}", decoded.rating);
    for (i, pet) in decoded.pets.iter().enumerate() {
        println!(
            "  Pet[{}] = (name={}, kind={:?}, age={}, tame={}, vaccinated={})",
            i, pet.name, pet.kind, pet.age, pet.tame, pet.vaccinated
        );
    }
    if let Some(node) = decoded.note.as_ref().and_then(|n| n.downcast_ref::<Node>()) {
        println!("note     = Node chain starting at {}", node.value);
    }

    assert_eq!(decoded, owner);
    Ok(())
}
