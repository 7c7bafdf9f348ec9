pub mod loan;
pub mod record;

pub use loan::*;
pub use record::*;
