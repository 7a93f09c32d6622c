//! Word-packed bit arrays with cached cardinality, boolean set algebra,
//! two subset-enumeration orders and a table-driven set-bit iterator.

pub mod bit_array;
pub mod bitops;
pub mod combination;
pub mod error;
pub mod exposure;
pub mod set_bits;
pub mod set_ops;

pub use crate::bit_array::BitArray;
pub use crate::combination::{Combinations, DepthFirstCombinations};
pub use crate::error::{Error, Result};
pub use crate::exposure::ExposedChoices;
pub use crate::set_bits::SetBitIndices;
