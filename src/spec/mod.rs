mod builder;
mod load;
mod types;

pub use builder::*;
pub use load::*;
pub use types::*;
