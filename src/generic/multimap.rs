use std::{
	cmp::Ordering,
	collections::VecDeque,
	fmt,
	marker::PhantomData,
	mem,
};
use cc_traits::{Slab, SlabMut};
use crate::{
	util::Color,
	Error,
	InvariantViolation,
};

/// Multimap node.
///
/// Holds a distinct key, the values bound to it in insertion order and the
/// color of the link coming from its parent.
#[derive(Clone)]
pub struct Node<K, V> {
	key: K,
	values: VecDeque<V>,
	color: Color,
	left: Option<usize>,
	right: Option<usize>,
}

impl<K, V> Node<K, V> {
	fn new(key: K, value: V) -> Node<K, V> {
		let mut values = VecDeque::new();
		values.push_back(value);

		Node {
			key,
			values,
			color: Color::Red,
			left: None,
			right: None,
		}
	}

	pub fn key(&self) -> &K {
		&self.key
	}

	pub fn color(&self) -> Color {
		self.color
	}
}

/// Ordered multi map.
///
/// In a multi map, each key is associated to a list of values, kept in
/// insertion order. Keys are stored in a left-leaning red-black tree whose
/// nodes live in the slab `C`, so every operation runs in `O(log n)` where `n`
/// is the number of distinct keys.
///
/// Removing a key pops the oldest value bound to it. The key itself leaves the
/// tree with its last value.
#[derive(Clone)]
pub struct OrderedMultimap<K, V, C> {
	nodes: C,
	root: Option<usize>,
	len: usize,
	value_count: usize,
	kv: PhantomData<(K, V)>,
}

impl<K, V, C> OrderedMultimap<K, V, C> {
	/// Create a new empty map.
	pub fn new() -> OrderedMultimap<K, V, C>
	where
		C: Default,
	{
		OrderedMultimap {
			nodes: C::default(),
			root: None,
			len: 0,
			value_count: 0,
			kv: PhantomData,
		}
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of values, summed over every key.
	pub fn value_count(&self) -> usize {
		self.value_count
	}

	pub fn clear(&mut self)
	where
		C: Default,
	{
		self.nodes = C::default();
		self.root = None;
		self.len = 0;
		self.value_count = 0;
	}
}

impl<K, V, C: Default> Default for OrderedMultimap<K, V, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, C: Slab<Node<K, V>>> OrderedMultimap<K, V, C>
where
	for<'r> C::ItemRef<'r>: Into<&'r Node<K, V>>,
{
	fn node(&self, id: usize) -> &Node<K, V> {
		self.nodes.get(id).map(Into::into).expect("dangling node index")
	}

	/// Absent nodes are black.
	fn is_red(&self, id: Option<usize>) -> bool {
		id.map(|id| self.node(id).color.is_red()).unwrap_or(false)
	}

	fn left_of(&self, id: Option<usize>) -> Option<usize> {
		id.and_then(|id| self.node(id).left)
	}

	fn find(&self, key: &K) -> Option<usize>
	where
		K: Ord,
	{
		let mut current = self.root;
		while let Some(id) = current {
			let node = self.node(id);
			current = match key.cmp(&node.key) {
				Ordering::Less => node.left,
				Ordering::Greater => node.right,
				Ordering::Equal => return Some(id),
			}
		}

		None
	}

	pub fn contains(&self, key: &K) -> bool
	where
		K: Ord,
	{
		self.find(key).is_some()
	}

	/// Oldest value bound to `key`.
	pub fn get(&self, key: &K) -> Result<&V, Error>
	where
		K: Ord,
	{
		self.find(key)
			.and_then(|id| self.node(id).values.front())
			.ok_or(Error::KeyNotFound)
	}

	/// Number of values bound to `key`.
	pub fn count(&self, key: &K) -> Result<usize, Error>
	where
		K: Ord,
	{
		self.find(key)
			.map(|id| self.node(id).values.len())
			.ok_or(Error::KeyNotFound)
	}

	pub fn min(&self) -> Result<&K, Error> {
		let mut id = self.root.ok_or(Error::EmptyContainer)?;
		while let Some(left) = self.node(id).left {
			id = left
		}

		Ok(&self.node(id).key)
	}

	pub fn max(&self) -> Result<&K, Error> {
		let mut id = self.root.ok_or(Error::EmptyContainer)?;
		while let Some(right) = self.node(id).right {
			id = right
		}

		Ok(&self.node(id).key)
	}

	/// Write the map content to the standard output, one key per line.
	pub fn print(&self)
	where
		K: fmt::Display,
		V: fmt::Display,
	{
		print!("{}", self)
	}

	fn fmt_in(&self, id: Option<usize>, f: &mut fmt::Formatter) -> fmt::Result
	where
		K: fmt::Display,
		V: fmt::Display,
	{
		if let Some(id) = id {
			let node = self.node(id);
			self.fmt_in(node.left, f)?;

			write!(f, "{}: [", node.key)?;
			for (i, value) in node.values.iter().enumerate() {
				if i > 0 {
					write!(f, ", ")?;
				}
				write!(f, "{}", value)?;
			}
			writeln!(f, "]")?;

			self.fmt_in(node.right, f)?;
		}

		Ok(())
	}

	/// Check the ordering and red-black invariants, along with the stored
	/// counters.
	pub fn validate(&self) -> Result<(), InvariantViolation>
	where
		K: Ord,
	{
		if self.is_red(self.root) {
			return Err(InvariantViolation::RedRoot);
		}

		let mut stats = Stats::default();
		self.validate_in(self.root, None, None, &mut stats)?;

		if stats.nodes == self.len && stats.values == self.value_count {
			Ok(())
		} else {
			Err(InvariantViolation::SizeMismatch)
		}
	}

	/// Returns the black height of the subtree.
	fn validate_in(
		&self,
		id: Option<usize>,
		lower: Option<&K>,
		upper: Option<&K>,
		stats: &mut Stats,
	) -> Result<usize, InvariantViolation>
	where
		K: Ord,
	{
		let id = match id {
			Some(id) => id,
			None => return Ok(1),
		};

		let node = self.node(id);
		if lower.map(|l| l >= &node.key).unwrap_or(false)
			|| upper.map(|u| u <= &node.key).unwrap_or(false)
		{
			return Err(InvariantViolation::Unordered);
		}

		if node.values.is_empty() {
			return Err(InvariantViolation::EmptyValues);
		}

		if self.is_red(node.right) {
			return Err(InvariantViolation::RightLeaningRed);
		}

		if node.color.is_red() && self.is_red(node.left) {
			return Err(InvariantViolation::ConsecutiveRed);
		}

		stats.nodes += 1;
		stats.values += node.values.len();

		let left = self.validate_in(node.left, lower, Some(&node.key), stats)?;
		let right = self.validate_in(node.right, Some(&node.key), upper, stats)?;
		if left != right {
			return Err(InvariantViolation::BlackImbalance);
		}

		Ok(left + if node.color.is_red() { 0 } else { 1 })
	}
}

#[derive(Default)]
struct Stats {
	nodes: usize,
	values: usize,
}

impl<K, V, C> fmt::Display for OrderedMultimap<K, V, C>
where
	K: fmt::Display,
	V: fmt::Display,
	C: Slab<Node<K, V>>,
	for<'r> C::ItemRef<'r>: Into<&'r Node<K, V>>,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.fmt_in(self.root, f)
	}
}

impl<K, V, C: SlabMut<Node<K, V>>> OrderedMultimap<K, V, C>
where
	for<'r> C::ItemRef<'r>: Into<&'r Node<K, V>>,
	for<'r> C::ItemMut<'r>: Into<&'r mut Node<K, V>>,
{
	fn node_mut(&mut self, id: usize) -> &mut Node<K, V> {
		self.nodes
			.get_mut(id)
			.map(Into::into)
			.expect("dangling node index")
	}

	fn release(&mut self, id: usize) -> Node<K, V> {
		self.nodes.remove(id).expect("dangling node index")
	}

	/// Make a right-leaning link lean to the left.
	///
	/// Returns the new subtree root.
	fn rotate_left(&mut self, h: usize) -> usize {
		let x = match self.node(h).right {
			Some(x) => x,
			None => return h,
		};

		let x_left = self.node(x).left;
		let color = self.node(h).color;

		let h_node = self.node_mut(h);
		h_node.right = x_left;
		h_node.color = Color::Red;

		let x_node = self.node_mut(x);
		x_node.left = Some(h);
		x_node.color = color;

		x
	}

	/// Make a left-leaning link lean to the right.
	///
	/// Returns the new subtree root.
	fn rotate_right(&mut self, h: usize) -> usize {
		let x = match self.node(h).left {
			Some(x) => x,
			None => return h,
		};

		let x_right = self.node(x).right;
		let color = self.node(h).color;

		let h_node = self.node_mut(h);
		h_node.left = x_right;
		h_node.color = Color::Red;

		let x_node = self.node_mut(x);
		x_node.right = Some(h);
		x_node.color = color;

		x
	}

	/// Flip the colors of a node and its two children.
	fn flip_colors(&mut self, h: usize) {
		let node = self.node_mut(h);
		node.color = node.color.flipped();
		let (left, right) = (node.left, node.right);

		for child in [left, right].into_iter().flatten() {
			let child = self.node_mut(child);
			child.color = child.color.flipped();
		}
	}

	/// Restore the left-leaning invariants of a subtree after a local change.
	fn fix_up(&mut self, mut h: usize) -> usize {
		if self.is_red(self.node(h).right) && !self.is_red(self.node(h).left) {
			h = self.rotate_left(h);
		}

		let left = self.node(h).left;
		if self.is_red(left) && self.is_red(self.left_of(left)) {
			h = self.rotate_right(h);
		}

		if self.is_red(self.node(h).left) && self.is_red(self.node(h).right) {
			self.flip_colors(h);
		}

		h
	}

	/// Make `h.left` or one of its children red, assuming `h` is red and both
	/// `h.left` and `h.left.left` are black.
	fn move_red_left(&mut self, mut h: usize) -> usize {
		self.flip_colors(h);

		let right = self.node(h).right;
		if let (Some(right), true) = (right, self.is_red(self.left_of(right))) {
			let right = self.rotate_right(right);
			self.node_mut(h).right = Some(right);
			h = self.rotate_left(h);
			self.flip_colors(h);
		}

		h
	}

	/// Make `h.right` or one of its children red, assuming `h` is red and both
	/// `h.right` and `h.right.left` are black.
	fn move_red_right(&mut self, mut h: usize) -> usize {
		self.flip_colors(h);

		let left = self.node(h).left;
		if self.is_red(self.left_of(left)) {
			h = self.rotate_right(h);
			self.flip_colors(h);
		}

		h
	}

	/// Bind `value` to `key`, after any value already bound to it.
	pub fn insert(&mut self, key: K, value: V)
	where
		K: Ord,
	{
		let root = self.insert_in(self.root, key, value);
		self.node_mut(root).color = Color::Black;
		self.root = Some(root);
		self.value_count += 1;
	}

	fn insert_in(&mut self, h: Option<usize>, key: K, value: V) -> usize
	where
		K: Ord,
	{
		let h = match h {
			Some(h) => h,
			None => {
				self.len += 1;
				log::trace!("new multimap node, {} keys", self.len);
				return self.nodes.insert(Node::new(key, value));
			}
		};

		match key.cmp(&self.node(h).key) {
			Ordering::Less => {
				let left = self.node(h).left;
				let left = self.insert_in(left, key, value);
				self.node_mut(h).left = Some(left)
			}
			Ordering::Greater => {
				let right = self.node(h).right;
				let right = self.insert_in(right, key, value);
				self.node_mut(h).right = Some(right)
			}
			Ordering::Equal => {
				// the shape is unchanged, nothing to rebalance.
				self.node_mut(h).values.push_back(value);
				return h;
			}
		}

		self.fix_up(h)
	}

	/// Unbind the oldest value bound to `key`.
	///
	/// The key is removed from the map with its last value. Removing an absent
	/// key does nothing and returns `None`.
	pub fn remove(&mut self, key: &K) -> Option<V>
	where
		K: Ord,
	{
		let id = self.find(key)?;
		if self.node(id).values.len() > 1 {
			self.value_count -= 1;
			return self.node_mut(id).values.pop_front();
		}

		let root = self.root?;
		if !self.is_red(self.node(root).left) && !self.is_red(self.node(root).right) {
			self.node_mut(root).color = Color::Red;
		}

		let (root, value) = self.remove_in(root, key);
		self.root = root;
		if let Some(root) = root {
			self.node_mut(root).color = Color::Black;
		}

		self.len -= 1;
		self.value_count -= 1;
		log::trace!("removed multimap node, {} keys", self.len);
		value
	}

	/// Delete the node holding `key`, which must be present in the subtree.
	///
	/// Returns the new subtree root and the value held by the deleted node.
	fn remove_in(&mut self, mut h: usize, key: &K) -> (Option<usize>, Option<V>)
	where
		K: Ord,
	{
		let value;

		if key < &self.node(h).key {
			let left = self.node(h).left;
			if !self.is_red(left) && !self.is_red(self.left_of(left)) {
				h = self.move_red_left(h);
			}

			let left = self.node(h).left;
			match left {
				Some(left) => {
					let (left, removed) = self.remove_in(left, key);
					self.node_mut(h).left = left;
					value = removed
				}
				None => value = None,
			}
		} else {
			if self.is_red(self.node(h).left) {
				h = self.rotate_right(h);
			}

			if key == &self.node(h).key && self.node(h).right.is_none() {
				// red leaf.
				let mut node = self.release(h);
				return (node.left, node.values.pop_front());
			}

			let right = self.node(h).right;
			if !self.is_red(right) && !self.is_red(self.left_of(right)) {
				h = self.move_red_right(h);
			}

			let right = self.node(h).right;
			let found = key == &self.node(h).key;
			match right {
				Some(right) if found => {
					let (right, min) = self.remove_min_in(right);
					let node = self.node_mut(h);
					node.right = right;
					node.key = min.key;
					let mut values = mem::replace(&mut node.values, min.values);
					value = values.pop_front()
				}
				Some(right) => {
					let (right, removed) = self.remove_in(right, key);
					self.node_mut(h).right = right;
					value = removed
				}
				None => value = None,
			}
		}

		(Some(self.fix_up(h)), value)
	}

	/// Unlink the minimum node of the given subtree.
	///
	/// Returns the new subtree root and the unlinked node.
	fn remove_min_in(&mut self, mut h: usize) -> (Option<usize>, Node<K, V>) {
		let left = self.node(h).left;
		if left.is_some() && !self.is_red(left) && !self.is_red(self.left_of(left)) {
			h = self.move_red_left(h);
		}

		let left = self.node(h).left;
		match left {
			Some(left) => {
				let (left, min) = self.remove_min_in(left);
				self.node_mut(h).left = left;
				(Some(self.fix_up(h)), min)
			}
			None => {
				let node = self.release(h);
				(node.right, node)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	type Map = OrderedMultimap<i32, &'static str, slab::Slab<Node<i32, &'static str>>>;

	fn black_height(map: &Map) -> usize {
		let mut height = 0;
		let mut current = map.root;
		while let Some(id) = current {
			if !map.node(id).color.is_red() {
				height += 1
			}
			current = map.node(id).left
		}
		height
	}

	#[test]
	fn new_nodes_are_red_and_root_is_black() {
		let mut map = Map::new();
		map.insert(2, "b");
		assert_eq!(map.node(map.root.unwrap()).color(), Color::Black);

		map.insert(1, "a");
		let left = map.node(map.root.unwrap()).left.unwrap();
		assert_eq!(map.node(left).color(), Color::Red);
		map.validate().unwrap();
	}

	#[test]
	fn ascending_insertion_rotates_left() {
		let mut map = Map::new();
		map.insert(1, "a");
		map.insert(2, "b");

		// 2 leaned right and was rotated up.
		let root = map.root.unwrap();
		assert_eq!(map.node(root).key(), &2);
		let left = map.node(root).left.unwrap();
		assert_eq!(map.node(left).key(), &1);
		assert!(map.node(left).color().is_red());

		// a third key splits the 3-node.
		map.insert(3, "c");
		let root = map.root.unwrap();
		assert_eq!(map.node(root).key(), &2);
		assert_eq!(black_height(&map), 2);
		map.validate().unwrap();
	}

	#[test]
	fn duplicate_insertion_keeps_shape() {
		let mut map = Map::new();
		for k in 0..10 {
			map.insert(k, "x");
		}
		let root = map.root;
		let height = black_height(&map);

		map.insert(4, "y");
		assert_eq!(map.root, root);
		assert_eq!(black_height(&map), height);
		assert_eq!(map.len(), 10);
		assert_eq!(map.value_count(), 11);
	}

	#[test]
	fn rotations_swap_colors() {
		let mut map = Map::new();
		map.insert(2, "b");
		map.insert(1, "a");

		let root = map.root.unwrap();
		let new_root = map.rotate_right(root);
		assert_eq!(map.node(new_root).key(), &1);
		assert_eq!(map.node(new_root).color(), Color::Black);
		assert_eq!(map.node(root).color(), Color::Red);
		assert_eq!(map.node(new_root).right, Some(root));

		let back = map.rotate_left(new_root);
		assert_eq!(back, root);
		assert_eq!(map.node(root).color(), Color::Black);
		assert_eq!(map.node(new_root).color(), Color::Red);
	}

	#[test]
	fn remove_red_leaf() {
		let mut map = Map::new();
		map.insert(2, "b");
		map.insert(1, "a");
		assert_eq!(map.remove(&1), Some("a"));
		assert_eq!(map.len(), 1);
		map.validate().unwrap();
	}

	#[test]
	fn remove_internal_node_moves_successor() {
		let mut map = Map::new();
		for (k, v) in [(4, "d"), (2, "b"), (6, "f"), (1, "a"), (3, "c"), (5, "e"), (7, "g")] {
			map.insert(k, v);
		}

		assert_eq!(map.remove(&4), Some("d"));
		map.validate().unwrap();
		assert!(!map.contains(&4));
		assert_eq!(map.get(&5), Ok(&"e"));
		assert_eq!(map.len(), 6);
	}

	#[test]
	fn validate_detects_right_leaning_red() {
		let mut map = Map::new();
		map.insert(1, "a");
		map.insert(2, "b");
		let root = map.root.unwrap();
		let left = map.node(root).left.unwrap();
		// swap the red link to the right.
		let node = map.node_mut(root);
		node.left = None;
		node.right = Some(left);
		assert!(map.validate().is_err());
	}

	#[test]
	fn validate_detects_red_root() {
		let mut map = Map::new();
		map.insert(1, "a");
		let root = map.root.unwrap();
		map.node_mut(root).color = Color::Red;
		assert_eq!(map.validate(), Err(InvariantViolation::RedRoot));
	}

	#[test]
	fn validate_detects_black_imbalance() {
		let mut map = Map::new();
		map.insert(2, "b");
		map.insert(1, "a");
		let left = map.node(map.root.unwrap()).left.unwrap();
		map.node_mut(left).color = Color::Black;
		assert_eq!(map.validate(), Err(InvariantViolation::BlackImbalance));
	}
}
