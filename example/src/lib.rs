//! Records generated from `schema.ks`.
//!
//! Regenerate with `kserial gen -i example/schema.ks -o example/src/generated.rs`.

pub mod generated;
