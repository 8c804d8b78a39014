mod capability;
mod tool;

pub use capability::*;
pub use tool::*;
