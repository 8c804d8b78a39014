mod address;
mod amount;
mod request;
mod token;
mod topology;
mod transaction;

pub use address::*;
pub use amount::*;
pub use request::*;
pub use token::*;
pub use topology::*;
pub use transaction::*;
