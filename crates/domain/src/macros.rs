//! Display/FromStr for status enums.
//!
//! Wire and log representations of status enums are lowercase strings;
//! parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use atelier_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum UploadStatus {
//!     Pending,
//!     Uploaded,
//! }
//!
//! impl_status_conversions!(UploadStatus {
//!     Pending => "pending",
//!     Uploaded => "uploaded",
//! });
//!
//! assert_eq!(UploadStatus::Uploaded.to_string(), "uploaded");
//! assert_eq!("PENDING".parse::<UploadStatus>(), Ok(UploadStatus::Pending));
//! ```

/// Implements `Display` and `FromStr` for a fieldless status enum.
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::AtelierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::AtelierError::InvalidInput(format!(
                        "invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
