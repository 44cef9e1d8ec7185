/// All graph element identifiers are 64-bit sequence numbers.
pub type ElementId = i64;
