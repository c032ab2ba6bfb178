//! Built-in checks
//!
//! Every check here validates a `str`: the rule layer stringifies raw
//! request values before dispatching to them.
//!
//! - **Length**: [`LengthRange`]
//! - **Content**: [`Email`], [`Url`], [`Alphanumeric`], [`Matches`]
//! - **Password**: [`StrongPassword`]
//! - **Numeric**: [`IsInt`], [`IsFloat`]
//! - **Logical**: [`IsBoolean`]

pub mod boolean;
pub mod content;
pub mod length;
pub mod numeric;
pub mod password;

pub use boolean::{IsBoolean, is_boolean};
pub use content::{Alphanumeric, Email, Matches, Url, alphanumeric, email, matches, url};
pub use length::{LengthRange, length_range};
pub use numeric::{IsFloat, IsInt, is_float, is_int};
pub use password::{PasswordPolicy, StrongPassword, strong_password};
