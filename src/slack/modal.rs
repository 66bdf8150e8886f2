use std::collections::HashMap;

use serde_json::Value;

/// Button value that asks for the open modal to be swapped for its update.
pub const CLICK_ME_VALUE: &str = "click_me_123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTemplate {
    Greeting,
    ClickMe,
    ClickMeUpdate,
}

impl ModalTemplate {
    fn source(self) -> &'static str {
        match self {
            Self::Greeting => include_str!("../modals/greeting.modal.json"),
            Self::ClickMe => include_str!("../modals/click_me.modal.json"),
            Self::ClickMeUpdate => include_str!("../modals/click_me_update.modal.json"),
        }
    }
}

/// A modal view rendered from one of the embedded `*.modal.json` templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackModal {
    pub data: String,
}

impl SlackModal {
    pub fn new(template: ModalTemplate) -> Self {
        Self {
            data: template.source().to_string(),
        }
    }

    /// Modal opened in reply to a slash command.
    pub fn greeting(user_name: &str) -> Self {
        let mut template: HashMap<&str, String> = HashMap::new();
        template.insert("user_name", user_name.to_string());

        let mut modal = Self::new(ModalTemplate::Greeting);
        modal.fill(&template);
        modal
    }

    /// Replaces every `{{key}}` found in `args` with its JSON-escaped value.
    ///
    /// Substitution is a single left-to-right pass, so values are never
    /// re-scanned for placeholders. Unknown keys are left as they are.
    pub fn fill(&mut self, args: &HashMap<&str, String>) -> &mut Self {
        let mut out = String::with_capacity(self.data.len());
        let mut rest = self.data.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let key = &after[..end];
            match args.get(key) {
                Some(value) => out.push_str(&escape(value)),
                None => {
                    out.push_str("{{");
                    out.push_str(key);
                    out.push_str("}}");
                }
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        self.data = out;
        self
    }

    pub fn view(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

fn escape(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_is_a_modal() {
        for (template, blocks) in [
            (ModalTemplate::Greeting, 1),
            (ModalTemplate::ClickMe, 3),
            (ModalTemplate::ClickMeUpdate, 2),
        ] {
            let view = SlackModal::new(template).view().unwrap();
            assert_eq!(view["type"], "modal", "{template:?}");
            assert_eq!(view["close"]["text"], "close");
            assert_eq!(view["submit"]["text"], "submit");
            assert_eq!(view["blocks"].as_array().unwrap().len(), blocks);
        }
    }

    #[test]
    fn greeting_mentions_user() {
        let view = SlackModal::greeting("alice").view().unwrap();
        assert_eq!(view["blocks"][0]["text"]["text"], "<@alice> Hello World!!");
        assert_eq!(view["blocks"][0]["text"]["type"], "mrkdwn");
    }

    #[test]
    fn greeting_is_deterministic() {
        assert_eq!(SlackModal::greeting("bob").data, SlackModal::greeting("bob").data);
        assert_ne!(SlackModal::greeting("bob").data, SlackModal::greeting("carol").data);
    }

    #[test]
    fn values_are_escaped() {
        let view = SlackModal::greeting("ev\"il\n{{user_name}}").view().unwrap();
        assert_eq!(
            view["blocks"][0]["text"]["text"],
            "<@ev\"il\n{{user_name}}> Hello World!!"
        );
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let mut modal = SlackModal::new(ModalTemplate::Greeting);
        let mut args: HashMap<&str, String> = HashMap::new();
        args.insert("nobody", "x".to_string());
        modal.fill(&args);

        assert!(modal.data.contains("<@{{user_name}}>"));
    }

    #[test]
    fn click_me_button_carries_update_value() {
        for template in [ModalTemplate::ClickMe, ModalTemplate::ClickMeUpdate] {
            let view = SlackModal::new(template).view().unwrap();
            assert_eq!(view["blocks"][0]["accessory"]["value"], CLICK_ME_VALUE);
        }
    }
}
