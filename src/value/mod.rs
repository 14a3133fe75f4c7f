pub mod numeric;
pub mod reference;
pub mod resolved;
pub mod scalar;

pub use numeric::*;
pub use reference::*;
pub use resolved::*;
pub use scalar::*;
