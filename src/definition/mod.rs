pub mod conversion;
pub mod document;
pub mod literal;
mod loader;

pub use conversion::*;
pub use document::*;
pub use literal::*;
