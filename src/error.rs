/// Failure of a lookup or bound query.
///
/// Every fallible operation checks for these conditions before touching the
/// tree, so an error never leaves a container partially modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// `min`, `max`, `floor` or `ceil` was called on an empty container.
	#[error("container is empty")]
	EmptyContainer,

	#[error("key not found")]
	KeyNotFound,

	/// Every stored key is greater than the queried key.
	#[error("no floor exists for key")]
	NoFloorExists,

	/// Every stored key is less than the queried key.
	#[error("no ceil exists for key")]
	NoCeilExists,

	/// The occurrence count of a multiset key would exceed `u32::MAX`.
	#[error("occurrence count overflow")]
	CountOverflow,
}

/// Structural defect reported by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
	#[error("keys are not in strictly ascending order")]
	Unordered,

	#[error("node holds a zero occurrence count")]
	ZeroCount,

	#[error("node holds an empty value list")]
	EmptyValues,

	#[error("red link leaning right")]
	RightLeaningRed,

	#[error("two consecutive red links")]
	ConsecutiveRed,

	#[error("black height differs between paths")]
	BlackImbalance,

	#[error("root is red")]
	RedRoot,

	#[error("stored size does not match tree content")]
	SizeMismatch,
}
