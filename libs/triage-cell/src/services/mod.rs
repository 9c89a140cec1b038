pub mod normalizer;
pub mod rules;
pub mod safety;
pub mod department;
pub mod lab;
pub mod intent;

pub use normalizer::normalize;
pub use rules::{Predicate, Rule};
pub use safety::is_urgent;
pub use department::route;
pub use lab::looks_like_lab;
pub use intent::{classify, resolve_intent};
