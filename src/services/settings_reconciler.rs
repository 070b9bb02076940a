use crate::dto::settings_dto::SettingsUpdatePayload;
use crate::error::{Error, Result};
use crate::models::settings::{SettingsDraft, UserSettings};
use crate::utils::validation::supplied;

/// Builds the update request from the current settings and the staged draft.
///
/// Checks run in order name, email, password, and the first failure wins.
/// Nothing here talks to the gateway, so a rejected draft never produces a
/// request.
pub fn reconcile(current: &UserSettings, draft: &SettingsDraft) -> Result<SettingsUpdatePayload> {
    let name = match supplied(&draft.new_name) {
        Some(new_name) if new_name != draft.confirm_new_name => {
            return Err(Error::Validation("name mismatch".to_string()))
        }
        Some(new_name) => new_name.to_string(),
        None => current.name.clone(),
    };

    let email = match supplied(&draft.new_email) {
        Some(new_email) if new_email != draft.confirm_new_email => {
            return Err(Error::Validation("email mismatch".to_string()))
        }
        Some(new_email) => Some(new_email.to_string()),
        None => None,
    };

    let (current_password, new_password) = match supplied(&draft.new_password) {
        Some(new_password) if new_password != draft.confirm_password => {
            return Err(Error::Validation("password mismatch".to_string()))
        }
        Some(new_password) => {
            let current_password = supplied(&draft.current_password).ok_or_else(|| {
                Error::Validation("current password required".to_string())
            })?;
            (
                Some(current_password.to_string()),
                Some(new_password.to_string()),
            )
        }
        None => (None, None),
    };

    Ok(SettingsUpdatePayload {
        name,
        theme: current.theme,
        weekly_reminder: current.weekly_reminder,
        monthly_reminder: current.monthly_reminder,
        email_notification: current.email_notification,
        email,
        current_password,
        new_password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Theme;
    use serde_json::json;

    fn current() -> UserSettings {
        UserSettings {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            theme: Theme::Dark,
            weekly_reminder: true,
            monthly_reminder: false,
            email_notification: true,
            profile_picture: None,
        }
    }

    fn validation_message(result: Result<SettingsUpdatePayload>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn confirmed_name_change_builds_full_payload() {
        let draft = SettingsDraft {
            new_name: "Bob".into(),
            confirm_new_name: "Bob".into(),
            ..Default::default()
        };

        let payload = reconcile(&current(), &draft).unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Bob",
                "theme": "dark",
                "weeklyReminder": true,
                "monthlyReminder": false,
                "emailNotification": true
            })
        );
    }

    #[test]
    fn unconfirmed_name_is_rejected() {
        let draft = SettingsDraft {
            new_name: "Bob".into(),
            confirm_new_name: "Bobby".into(),
            ..Default::default()
        };
        assert_eq!(validation_message(reconcile(&current(), &draft)), "name mismatch");
    }

    #[test]
    fn empty_draft_keeps_current_name() {
        let payload = reconcile(&current(), &SettingsDraft::default()).unwrap();
        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.email, None);
        assert_eq!(payload.new_password, None);
    }

    #[test]
    fn email_is_sent_only_when_confirmed() {
        let mut draft = SettingsDraft {
            new_email: "bob@example.com".into(),
            confirm_new_email: "bob@example.org".into(),
            ..Default::default()
        };
        assert_eq!(validation_message(reconcile(&current(), &draft)), "email mismatch");

        draft.confirm_new_email = "bob@example.com".into();
        let payload = reconcile(&current(), &draft).unwrap();
        assert_eq!(payload.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn password_change_needs_confirmation_and_current_password() {
        let mut draft = SettingsDraft {
            new_password: "n3w".into(),
            confirm_password: "n3w!".into(),
            ..Default::default()
        };
        assert_eq!(validation_message(reconcile(&current(), &draft)), "password mismatch");

        draft.confirm_password = "n3w".into();
        assert_eq!(
            validation_message(reconcile(&current(), &draft)),
            "current password required"
        );

        draft.current_password = "old".into();
        let payload = reconcile(&current(), &draft).unwrap();
        assert_eq!(payload.current_password.as_deref(), Some("old"));
        assert_eq!(payload.new_password.as_deref(), Some("n3w"));
    }

    #[test]
    fn name_is_checked_before_password() {
        let draft = SettingsDraft {
            new_name: "Bob".into(),
            confirm_new_name: "Rob".into(),
            new_password: "x".into(),
            ..Default::default()
        };
        assert_eq!(validation_message(reconcile(&current(), &draft)), "name mismatch");
    }
}
