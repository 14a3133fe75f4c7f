//! Calculations of the built-in operation kinds, grouped by family.

pub(super) mod aggregate;
pub(super) mod arithmetic;
pub(super) mod map;
pub(super) mod random;
pub(super) mod text;
pub(super) mod trig;
