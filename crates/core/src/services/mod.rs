mod dispatcher;
mod resolver;
mod staking;
mod transfer;

pub use dispatcher::*;
pub use resolver::*;
pub use staking::*;
pub use transfer::*;
