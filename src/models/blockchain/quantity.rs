//! Serde adapters for JSON-RPC quantities kept as native integers.
//!
//! Heights, timestamps, nonces and gas amounts fit in 64 bits and are stored as `u64`,
//! with the wire format handled by alloy's [`U64`]. Some nodes return small values as
//! plain JSON numbers, which are accepted too. Amounts that can exceed 64 bits
//! (difficulty, wei) are stored as [`U256`] and use its serde directly.

use alloy_primitives::{U256, U64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
	Number(u64),
	Quantity(U64),
}

impl From<RawQuantity> for u64 {
	fn from(raw: RawQuantity) -> Self {
		match raw {
			RawQuantity::Number(n) => n,
			RawQuantity::Quantity(q) => q.to::<u64>(),
		}
	}
}

/// Lossy conversion of a 256-bit quantity for averages and gauges
pub fn to_f64(value: U256) -> f64 {
	value
		.as_limbs()
		.iter()
		.rev()
		.fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

/// `u64` quantities
pub mod u64_hex {
	use super::*;

	pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
		U64::from(*value).serialize(serializer)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
		RawQuantity::deserialize(deserializer).map(u64::from)
	}
}

/// Optional `u64` quantities (`null` or missing maps to `None`)
pub mod option_u64_hex {
	use super::*;

	pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
		value.map(U64::from).serialize(serializer)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<u64>, D::Error> {
		Ok(Option::<RawQuantity>::deserialize(deserializer)?.map(u64::from))
	}
}
