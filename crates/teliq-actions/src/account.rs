//! Account and capability queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `get_login_info`: the bot's own account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GetLoginInfo {}

/// `get_stranger_info`: public profile of any user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GetStrangerInfo {
    /// Target user.
    pub user_id: i64,
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `get_friend_list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GetFriendList {
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `get_status`: server health.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GetStatus {}

/// `get_version_info`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GetVersionInfo {}

/// `can_send_image`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CanSendImage {}

/// `can_send_record`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CanSendRecord {}

/// Result of `get_login_info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginInfo {
    /// Bot account ID.
    pub user_id: i64,
    /// Bot nickname.
    pub nickname: String,
}

/// Result of `get_stranger_info`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StrangerInfo {
    /// User ID.
    pub user_id: i64,
    /// Nickname.
    pub nickname: String,
    /// `male`, `female` or `unknown`.
    pub sex: String,
    /// Age.
    pub age: i64,
    /// Implementation-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `get_friend_list`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FriendInfo {
    /// User ID.
    pub user_id: i64,
    /// Nickname.
    pub nickname: String,
    /// Remark set by the bot.
    pub remark: String,
    /// Implementation-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `get_status`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Whether the account is online.
    pub online: bool,
    /// Whether the server is healthy.
    pub good: bool,
    /// Implementation-specific fields (statistics and the like).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `get_version_info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Server implementation name.
    pub app_name: String,
    /// Server implementation version.
    pub app_version: String,
    /// Protocol version.
    pub protocol_version: String,
}

/// Result of the `can_send_*` queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capability {
    /// Whether the capability is available.
    pub yes: bool,
}

actions! {
    GetLoginInfo => "get_login_info" => LoginInfo,
    GetStrangerInfo => "get_stranger_info" => StrangerInfo,
    GetFriendList => "get_friend_list" => Vec<FriendInfo>,
    GetStatus => "get_status" => Status,
    GetVersionInfo => "get_version_info" => VersionInfo,
    CanSendImage => "can_send_image" => Capability,
    CanSendRecord => "can_send_record" => Capability,
}
