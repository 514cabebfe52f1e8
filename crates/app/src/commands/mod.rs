//! Commands - UI to backend bridge

mod artwork;
mod session;

pub use artwork::*;
pub use session::*;
