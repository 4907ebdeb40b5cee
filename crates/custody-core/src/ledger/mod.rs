//! Value custody abstraction.

mod memory;
mod traits;

pub use memory::InMemoryCustody;
pub use traits::{Custody, CustodyError, Payout, Receipt};
