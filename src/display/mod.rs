//! Display module for colour management and table formatting
//!
//! Output is only ever decorated when the io stream says it can be.

pub mod colours;
pub mod table;

pub use colours::*;
pub use table::*;
