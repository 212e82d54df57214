mod amount;
mod input;
mod transaction;

pub use amount::*;
pub use input::*;
pub use transaction::*;
