use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::models::Block;

/// The most recent blocks, ordered newest first
///
/// A window is never patched in place: every change produces a new value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BlockWindow(Vec<Block>);

impl BlockWindow {
	/// Builds a window, ordering blocks newest first
	pub fn new(mut blocks: Vec<Block>) -> Self {
		blocks.sort_by(|a, b| b.number.cmp(&a.number));
		Self(blocks)
	}

	/// The most recent block, if any
	pub fn newest(&self) -> Option<&Block> {
		self.0.first()
	}

	/// The oldest block, if any
	pub fn oldest(&self) -> Option<&Block> {
		self.0.last()
	}

	/// Returns a new window with `block` as its newest entry, keeping at most `capacity` blocks
	///
	/// A block already present at the same height is replaced (reorg).
	pub fn with_newest(&self, block: Block, capacity: usize) -> Self {
		let mut blocks: Vec<Block> = self
			.0
			.iter()
			.filter(|b| b.number != block.number)
			.cloned()
			.collect();
		blocks.push(block);
		let mut window = Self::new(blocks);
		window.0.truncate(capacity);
		window
	}

	pub fn blocks(&self) -> &[Block] {
		&self.0
	}

	pub fn into_blocks(self) -> Vec<Block> {
		self.0
	}
}

impl Deref for BlockWindow {
	type Target = [Block];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<Block>> for BlockWindow {
	fn from(blocks: Vec<Block>) -> Self {
		Self::new(blocks)
	}
}
