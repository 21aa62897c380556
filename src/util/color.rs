/// Color of the link pointing to a red-black tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
	Red,
	Black,
}

impl Color {
	pub fn is_red(&self) -> bool {
		matches!(self, Color::Red)
	}

	/// Opposite color.
	pub fn flipped(self) -> Color {
		match self {
			Color::Red => Color::Black,
			Color::Black => Color::Red,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flip_is_an_involution() {
		assert_eq!(Color::Red.flipped(), Color::Black);
		assert_eq!(Color::Black.flipped(), Color::Red);
		assert_eq!(Color::Red.flipped().flipped(), Color::Red);
		assert!(Color::Red.is_red());
		assert!(!Color::Black.is_red());
	}
}
