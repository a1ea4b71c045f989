pub mod error;
pub mod filter;
pub mod store;
pub mod types;

pub use error::*;
pub use filter::*;
pub use store::*;
pub use types::*;
