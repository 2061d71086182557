mod cache;
mod table;

pub use cache::*;
pub use table::*;
