//! Group queries and administration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use teliq_core::Empty;

/// `get_group_info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GetGroupInfo {
    /// Target group.
    pub group_id: i64,
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `get_group_list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GetGroupList {
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `get_group_member_info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GetGroupMemberInfo {
    /// Group.
    pub group_id: i64,
    /// Member.
    pub user_id: i64,
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `get_group_member_list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GetGroupMemberList {
    /// Group.
    pub group_id: i64,
    /// Bypass the server's cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_cache: Option<bool>,
}

/// `set_group_kick`: remove a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupKick {
    /// Group.
    pub group_id: i64,
    /// Member to remove.
    pub user_id: i64,
    /// Refuse future join requests from this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_add_request: Option<bool>,
}

/// `set_group_ban`: mute a member. A zero duration lifts the mute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupBan {
    /// Group.
    pub group_id: i64,
    /// Member to mute.
    pub user_id: i64,
    /// Mute length in seconds.
    pub duration: u64,
}

/// `set_group_whole_ban`: mute everyone but admins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupWholeBan {
    /// Group.
    pub group_id: i64,
    /// Turn the mute on or off.
    pub enable: bool,
}

/// `set_group_admin`: grant or revoke admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupAdmin {
    /// Group.
    pub group_id: i64,
    /// Member.
    pub user_id: i64,
    /// Grant (`true`) or revoke.
    pub enable: bool,
}

/// `set_group_card`: set a member's group card. Empty clears it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupCard {
    /// Group.
    pub group_id: i64,
    /// Member.
    pub user_id: i64,
    /// New card.
    pub card: String,
}

/// `set_group_name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupName {
    /// Group.
    pub group_id: i64,
    /// New name.
    pub group_name: String,
}

/// `set_group_leave`: leave, or dismiss when owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupLeave {
    /// Group.
    pub group_id: i64,
    /// Dismiss the group (owner only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dismiss: Option<bool>,
}

/// `set_group_special_title`: set a member's title (owner only).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupSpecialTitle {
    /// Group.
    pub group_id: i64,
    /// Member.
    pub user_id: i64,
    /// Title. Empty removes it.
    pub special_title: String,
}

/// Result of `get_group_info` and entry of `get_group_list`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupInfo {
    /// Group ID.
    pub group_id: i64,
    /// Group name.
    pub group_name: String,
    /// Current members.
    pub member_count: i64,
    /// Member limit.
    pub max_member_count: i64,
    /// Implementation-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `get_group_member_info` and entry of `get_group_member_list`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupMemberInfo {
    /// Group ID.
    pub group_id: i64,
    /// Member ID.
    pub user_id: i64,
    /// Account nickname.
    pub nickname: String,
    /// Group card.
    pub card: String,
    /// `male`, `female` or `unknown`.
    pub sex: String,
    /// Age.
    pub age: i64,
    /// Join time (Unix seconds).
    pub join_time: i64,
    /// Last message time (Unix seconds).
    pub last_sent_time: i64,
    /// `owner`, `admin` or `member`.
    pub role: String,
    /// Special title.
    pub title: String,
    /// Implementation-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GroupMemberInfo {
    /// Whether the member is the owner or an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role.as_str(), "owner" | "admin")
    }
}

actions! {
    GetGroupInfo => "get_group_info" => GroupInfo,
    GetGroupList => "get_group_list" => Vec<GroupInfo>,
    GetGroupMemberInfo => "get_group_member_info" => GroupMemberInfo,
    GetGroupMemberList => "get_group_member_list" => Vec<GroupMemberInfo>,
    SetGroupKick => "set_group_kick" => Empty,
    SetGroupBan => "set_group_ban" => Empty,
    SetGroupWholeBan => "set_group_whole_ban" => Empty,
    SetGroupAdmin => "set_group_admin" => Empty,
    SetGroupCard => "set_group_card" => Empty,
    SetGroupName => "set_group_name" => Empty,
    SetGroupLeave => "set_group_leave" => Empty,
    SetGroupSpecialTitle => "set_group_special_title" => Empty,
}
