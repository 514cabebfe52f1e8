mod conversions;

pub use conversions::{status_error, InfraError};
