use std::{cmp::Ordering, marker::PhantomData};
use cc_traits::{Slab, SlabMut};
use crate::{Error, InvariantViolation};

/// Multiset node.
///
/// Holds a distinct key along with the number of times it was inserted.
#[derive(Clone)]
pub struct Node<K> {
	key: K,
	count: u32,
	left: Option<usize>,
	right: Option<usize>,
}

impl<K> Node<K> {
	fn new(key: K) -> Node<K> {
		Node {
			key,
			count: 1,
			left: None,
			right: None,
		}
	}

	pub fn key(&self) -> &K {
		&self.key
	}

	pub fn count(&self) -> u32 {
		self.count
	}
}

/// Ordered multiset.
///
/// Keys are stored in a plain (unbalanced) binary search tree whose nodes live
/// in the slab `C`. Inserting an already present key only bumps its occurrence
/// count. Since the tree does not rebalance itself, operations run in `O(h)`
/// where `h` is the height of the tree, which may be linear in the number of
/// distinct keys for sorted insertion sequences.
#[derive(Clone)]
pub struct OrderedMultiset<K, C> {
	nodes: C,
	root: Option<usize>,
	len: usize,
	k: PhantomData<K>,
}

impl<K, C> OrderedMultiset<K, C> {
	/// Create a new empty multiset.
	pub fn new() -> OrderedMultiset<K, C>
	where
		C: Default,
	{
		OrderedMultiset {
			nodes: C::default(),
			root: None,
			len: 0,
			k: PhantomData,
		}
	}

	/// Number of occurrences stored, duplicates included.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Remove every key.
	pub fn clear(&mut self)
	where
		C: Default,
	{
		self.nodes = C::default();
		self.root = None;
		self.len = 0;
	}
}

impl<K, C: Default> Default for OrderedMultiset<K, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, C: Slab<Node<K>>> OrderedMultiset<K, C>
where
	for<'r> C::ItemRef<'r>: Into<&'r Node<K>>,
{
	fn node(&self, id: usize) -> &Node<K> {
		self.nodes.get(id).map(Into::into).expect("dangling node index")
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

	/// Number of times `key` occurs in the multiset.
	pub fn count(&self, key: &K) -> Result<u32, Error>
	where
		K: Ord,
	{
		self.find(key)
			.map(|id| self.node(id).count)
			.ok_or(Error::KeyNotFound)
	}

	/// Number of distinct keys.
	pub fn distinct_len(&self) -> usize {
		let mut count = 0;
		let mut stack: Vec<usize> = self.root.into_iter().collect();
		while let Some(id) = stack.pop() {
			let node = self.node(id);
			stack.extend(node.left);
			stack.extend(node.right);
			count += 1
		}

		count
	}

	/// Greatest stored key less than or equal to `key`.
	pub fn floor(&self, key: &K) -> Result<&K, Error>
	where
		K: Ord,
	{
		if self.root.is_none() {
			return Err(Error::EmptyContainer);
		}

		let mut candidate = None;
		let mut current = self.root;
		while let Some(id) = current {
			let node = self.node(id);
			match key.cmp(&node.key) {
				Ordering::Equal => return Ok(&node.key),
				Ordering::Greater => {
					// a tighter floor may still be found on the right.
					candidate = Some(&node.key);
					current = node.right
				}
				Ordering::Less => current = node.left,
			}
		}

		candidate.ok_or(Error::NoFloorExists)
	}

	/// Least stored key greater than or equal to `key`.
	pub fn ceil(&self, key: &K) -> Result<&K, Error>
	where
		K: Ord,
	{
		if self.root.is_none() {
			return Err(Error::EmptyContainer);
		}

		let mut candidate = None;
		let mut current = self.root;
		while let Some(id) = current {
			let node = self.node(id);
			match key.cmp(&node.key) {
				Ordering::Equal => return Ok(&node.key),
				Ordering::Less => {
					candidate = Some(&node.key);
					current = node.left
				}
				Ordering::Greater => current = node.right,
			}
		}

		candidate.ok_or(Error::NoCeilExists)
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

	/// Check the binary search tree ordering and the occurrence counts.
	pub fn validate(&self) -> Result<(), InvariantViolation>
	where
		K: Ord,
	{
		let mut total = 0;
		// node along with its exclusive lower and upper key bounds.
		let mut stack: Vec<(usize, Option<&K>, Option<&K>)> = Vec::new();
		stack.extend(self.root.map(|root| (root, None, None)));

		while let Some((id, lower, upper)) = stack.pop() {
			let node = self.node(id);
			if lower.map(|l| l >= &node.key).unwrap_or(false)
				|| upper.map(|u| u <= &node.key).unwrap_or(false)
			{
				return Err(InvariantViolation::Unordered);
			}

			if node.count == 0 {
				return Err(InvariantViolation::ZeroCount);
			}

			total += node.count as usize;
			if let Some(left) = node.left {
				stack.push((left, lower, Some(&node.key)));
			}
			if let Some(right) = node.right {
				stack.push((right, Some(&node.key), upper));
			}
		}

		if total == self.len {
			Ok(())
		} else {
			Err(InvariantViolation::SizeMismatch)
		}
	}
}

impl<K, C: SlabMut<Node<K>>> OrderedMultiset<K, C>
where
	for<'r> C::ItemRef<'r>: Into<&'r Node<K>>,
	for<'r> C::ItemMut<'r>: Into<&'r mut Node<K>>,
{
	fn node_mut(&mut self, id: usize) -> &mut Node<K> {
		self.nodes
			.get_mut(id)
			.map(Into::into)
			.expect("dangling node index")
	}

	fn release(&mut self, id: usize) -> Node<K> {
		self.nodes.remove(id).expect("dangling node index")
	}

	/// Point `slot` to `child`.
	fn link(&mut self, slot: Slot, child: Option<usize>) {
		match slot {
			Slot::Root => self.root = child,
			Slot::Left(parent) => self.node_mut(parent).left = child,
			Slot::Right(parent) => self.node_mut(parent).right = child,
		}
	}

	/// Insert one occurrence of `key`.
	///
	/// Returns the number of occurrences of `key` after insertion.
	///
	/// # Panics
	///
	/// Panics if the occurrence count of `key` would exceed `u32::MAX`.
	/// See [`try_insert`](Self::try_insert) for a non-panicking version.
	pub fn insert(&mut self, key: K) -> u32
	where
		K: Ord,
	{
		match self.try_insert(key) {
			Ok(count) => count,
			Err(e) => panic!("{}", e),
		}
	}

	/// Insert one occurrence of `key`, unless its occurrence count is already
	/// `u32::MAX`, in which case the multiset is left unchanged.
	pub fn try_insert(&mut self, key: K) -> Result<u32, Error>
	where
		K: Ord,
	{
		let mut slot = Slot::Root;
		let mut current = self.root;
		while let Some(id) = current {
			let node = self.node(id);
			match key.cmp(&node.key) {
				Ordering::Less => {
					slot = Slot::Left(id);
					current = node.left
				}
				Ordering::Greater => {
					slot = Slot::Right(id);
					current = node.right
				}
				Ordering::Equal => {
					let count = node.count.checked_add(1).ok_or(Error::CountOverflow)?;
					self.node_mut(id).count = count;
					self.len += 1;
					return Ok(count);
				}
			}
		}

		log::trace!("new multiset node");
		let id = self.nodes.insert(Node::new(key));
		self.link(slot, Some(id));
		self.len += 1;
		Ok(1)
	}

	/// Remove one occurrence of `key`.
	///
	/// The node holding `key` is deleted once its last occurrence is removed.
	pub fn remove(&mut self, key: &K) -> Result<(), Error>
	where
		K: Ord,
	{
		let mut slot = Slot::Root;
		let mut current = self.root;
		let id = loop {
			let id = current.ok_or(Error::KeyNotFound)?;
			let node = self.node(id);
			match key.cmp(&node.key) {
				Ordering::Less => {
					slot = Slot::Left(id);
					current = node.left
				}
				Ordering::Greater => {
					slot = Slot::Right(id);
					current = node.right
				}
				Ordering::Equal => break id,
			}
		};

		let node = self.node(id);
		if node.count > 1 {
			self.node_mut(id).count -= 1;
		} else {
			match (node.left, node.right) {
				(None, child) | (child, None) => {
					self.release(id);
					self.link(slot, child)
				}
				(Some(_), Some(right)) => {
					// the successor takes this node's place, count included.
					let successor = self.detach_min(Slot::Right(id), right);
					let node = self.node_mut(id);
					node.key = successor.key;
					node.count = successor.count;
				}
			}
			log::trace!("removed multiset node");
		}

		self.len -= 1;
		Ok(())
	}

	/// Unlink the minimum node of the subtree rooted at `id`, whatever its
	/// count. `slot` is the link pointing to `id`.
	fn detach_min(&mut self, mut slot: Slot, mut id: usize) -> Node<K> {
		while let Some(left) = self.node(id).left {
			slot = Slot::Left(id);
			id = left
		}

		let node = self.release(id);
		self.link(slot, node.right);
		node
	}
}

/// Link from a parent to one of its children.
#[derive(Clone, Copy)]
enum Slot {
	Root,
	Left(usize),
	Right(usize),
}
