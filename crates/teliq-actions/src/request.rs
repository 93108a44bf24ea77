//! Friend and group join requests.

use serde::Serialize;
use teliq_core::Empty;

/// `set_friend_add_request`: answer a friend request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetFriendAddRequest {
    /// `flag` from the request event.
    pub flag: String,
    /// Accept (`true`) or decline.
    pub approve: bool,
    /// Remark for the new friend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// `set_group_add_request`: answer a join request or invitation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetGroupAddRequest {
    /// `flag` from the request event.
    pub flag: String,
    /// `add` or `invite`, from the request event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Accept (`true`) or decline.
    pub approve: bool,
    /// Reason shown when declining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

actions! {
    SetFriendAddRequest => "set_friend_add_request" => Empty,
    SetGroupAddRequest => "set_group_add_request" => Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teliq_core::Action;

    #[test]
    fn friend_request_params() {
        let p = SetFriendAddRequest {
            flag: "f1".into(),
            approve: true,
            remark: None,
        };
        assert_eq!(SetFriendAddRequest::NAME, "set_friend_add_request");
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            json!({"flag": "f1", "approve": true})
        );
    }

    #[test]
    fn group_request_params() {
        let p = SetGroupAddRequest {
            flag: "f2".into(),
            sub_type: Some("invite".into()),
            approve: false,
            reason: Some("no".into()),
        };
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            json!({"flag": "f2", "sub_type": "invite", "approve": false, "reason": "no"})
        );
    }
}
