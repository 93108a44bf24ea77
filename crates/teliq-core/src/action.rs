//! Static binding between a logical operation and its wire action.
//!
//! An [`Action`] value is the `params` object of a request; the associated
//! [`Action::NAME`] is the wire `action` string and [`Action::Output`] is the
//! type the response `data` decodes into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A remote operation with typed params and result.
pub trait Action: Serialize + Send + Sync {
    /// Wire action name (e.g. `send_private_msg`).
    const NAME: &'static str;

    /// Type the response `data` decodes into.
    type Output: DeserializeOwned + Send + 'static;
}

/// Result type for actions whose response carries no data.
///
/// Decodes from `{}` and from `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Empty;

impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let _ = serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}
