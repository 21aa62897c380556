//! Ordered containers allowing duplicate keys.
//!
//! This library defines two types, both storing their nodes in a
//! [`slab`](https://crates.io/crates/slab) by default:
//!   - `OrderedMultiset<K>`, a set counting the occurrences of each key,
//!     backed by a plain binary search tree;
//!   - `OrderedMultimap<K, V>`, a map binding each key to a list of values,
//!     backed by a left-leaning red-black tree.
//!
//! ## Usage
//!
//! Keys only need to be totally ordered.
//!
//! ```
//! use ordered_multi::{Error, OrderedMultiset};
//!
//! let mut set: OrderedMultiset<i32> = OrderedMultiset::new();
//! set.insert(5);
//! set.insert(3);
//! set.insert(7);
//! set.insert(3);
//! assert_eq!(set.len(), 4);
//! assert_eq!(set.count(&3), Ok(2));
//! assert_eq!(set.floor(&4), Ok(&3));
//! assert_eq!(set.ceil(&6), Ok(&7));
//! assert_eq!(set.floor(&2), Err(Error::NoFloorExists));
//! ```
//!
//! A multimap keeps the values of a key in insertion order. Removing a key
//! pops its oldest value, and removing an absent key does nothing.
//!
//! ```
//! use ordered_multi::OrderedMultimap;
//!
//! let mut map: OrderedMultimap<&str, i32> = OrderedMultimap::new();
//! map.insert("a", 1);
//! map.insert("a", 2);
//! map.insert("b", 3);
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&"a"), Ok(&1));
//!
//! assert_eq!(map.remove(&"a"), Some(1));
//! assert_eq!(map.get(&"a"), Ok(&2));
//! assert_eq!(map.remove(&"c"), None);
//! assert_eq!(map.to_string(), "a: [2]\nb: [3]\n");
//! ```
//!
//! ### Storage
//!
//! The `generic` module defines the same types parameterized by their node
//! storage, which can be any [`cc_traits::SlabMut`] implementation.
//!
//! Neither container is synchronized. Wrap it in a lock to share it between
//! threads.
mod error;
pub mod generic;
pub mod util;

pub use error::*;

pub type DefaultSetContainer<K> = slab::Slab<generic::multiset::Node<K>>;
pub type DefaultMapContainer<K, V> = slab::Slab<generic::multimap::Node<K, V>>;

pub type OrderedMultiset<K> = generic::OrderedMultiset<K, DefaultSetContainer<K>>;
pub type OrderedMultimap<K, V> = generic::OrderedMultimap<K, V, DefaultMapContainer<K, V>>;
