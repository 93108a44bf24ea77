//! # teliq-actions
//!
//! Typed catalog of common OneBot-11 actions. Each params struct implements
//! [`teliq_core::Action`], binding it to its wire name and result type:
//!
//! ```ignore
//! let sent = session.call(&SendPrivateMsg::new(10001, "hello")).await?;
//! println!("{}", sent.message_id);
//! ```

#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod account;
pub mod group;
pub mod message;
pub mod request;

pub use account::*;
pub use group::*;
pub use message::*;
pub use request::*;

/// Every wire action name in the catalog.
pub fn all_names() -> impl Iterator<Item = &'static str> {
    message::NAMES
        .iter()
        .chain(account::NAMES)
        .chain(group::NAMES)
        .chain(request::NAMES)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: Vec<_> = all_names().collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 28);
    }

    #[test]
    fn catalog_covers_send_and_group_admin() {
        let names: HashSet<_> = all_names().collect();
        for name in ["send_private_msg", "get_msg", "set_group_whole_ban", "set_group_add_request"] {
            assert!(names.contains(name), "{name} missing");
        }
    }
}
