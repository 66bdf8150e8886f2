use serde::{Deserialize, Serialize};

/// Form body Slack posts for a slash command.
///
/// `command`, `user_id`, `user_name` and `trigger_id` are required; the rest
/// default to empty when Slack leaves them out.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SlashCommand {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub team_domain: String,
    #[serde(default)]
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub response_url: String,
    pub trigger_id: String,
    #[serde(default)]
    pub api_app_id: String,
}

/// Interactive callbacks arrive as a form with a single JSON `payload` field.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SlackInteraction {
    pub payload: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackInteractionUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub team_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackInteractionView {
    pub id: String,
    pub external_id: String,
    pub hash: String,
    pub callback_id: String,
    pub private_metadata: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackInteractionContainer {
    pub r#type: String,
    pub view_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackBlockAction {
    pub action_id: String,
    pub block_id: String,
    pub r#type: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackShortcut {
    pub callback_id: String,
    pub trigger_id: String,
    pub user: SlackInteractionUser,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackBlockActions {
    pub trigger_id: String,
    pub user: SlackInteractionUser,
    pub view: SlackInteractionView,
    pub container: SlackInteractionContainer,
    pub actions: Vec<SlackBlockAction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlackViewSubmission {
    pub trigger_id: String,
    pub user: SlackInteractionUser,
    pub view: SlackInteractionView,
}

/// Decoded `payload` of an interactive callback, keyed on its `type` field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionCallback {
    Shortcut(SlackShortcut),
    BlockActions(SlackBlockActions),
    ViewSubmission(SlackViewSubmission),
    #[serde(other)]
    Unknown,
}

impl InteractionCallback {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Shortcut(shortcut) => Some(&shortcut.user.id),
            Self::BlockActions(actions) => Some(&actions.user.id),
            Self::ViewSubmission(submission) => Some(&submission.user.id),
            Self::Unknown => None,
        }
    }

    pub fn callback_id(&self) -> Option<&str> {
        match self {
            Self::Shortcut(shortcut) => Some(&shortcut.callback_id),
            Self::BlockActions(actions) => Some(&actions.view.callback_id),
            Self::ViewSubmission(submission) => Some(&submission.view.callback_id),
            Self::Unknown => None,
        }
    }
}

impl SlackInteraction {
    pub fn callback(&self) -> Result<InteractionCallback, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}
