pub mod multimap;
pub mod multiset;

pub use multimap::OrderedMultimap;
pub use multiset::OrderedMultiset;
