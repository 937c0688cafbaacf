pub mod errors;
pub mod money;
pub mod pagination;
pub mod retry;
pub mod shutdown;

pub use errors::*;
pub use pagination::*;
