pub mod reference;

pub use reference::{complement_pairs, ReferenceModel};
