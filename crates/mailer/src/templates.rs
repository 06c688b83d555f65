//! Embedded account email templates.

use tera::{Context, Tera};

use crate::MailerError;

/// The account events that produce a notification email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEmail {
    Created,
    Deleted,
    PasswordChanged,
}

impl AccountEmail {
    /// Subject line for the event
    pub fn subject(self) -> &'static str {
        match self {
            AccountEmail::Created => "account created",
            AccountEmail::Deleted => "account deleted",
            AccountEmail::PasswordChanged => "password changed",
        }
    }

    fn template_base(self) -> &'static str {
        match self {
            AccountEmail::Created => "account_created",
            AccountEmail::Deleted => "account_deleted",
            AccountEmail::PasswordChanged => "password_changed",
        }
    }

    pub(crate) fn text_template(self) -> String {
        format!("{}.txt", self.template_base())
    }

    pub(crate) fn html_template(self) -> String {
        format!("{}.html", self.template_base())
    }
}

const ACCOUNT_CREATED_TXT: &str = r#"Hello {{ name }},

Welcome to {{ app_name }}! Your account has been created and your
predefined shelves are ready: To read, Currently reading, Read, and
Did not finish.

Happy reading,
The {{ app_name }} team
"#;

const ACCOUNT_CREATED_HTML: &str = r#"<html>
<body>
    <h1>Welcome to {{ app_name }}!</h1>
    <p>Hello {{ name }},</p>
    <p>Your account has been created and your predefined shelves are ready:
    <em>To read</em>, <em>Currently reading</em>, <em>Read</em>, and
    <em>Did not finish</em>.</p>
    <p>Happy reading,<br>The {{ app_name }} team</p>
</body>
</html>
"#;

const ACCOUNT_DELETED_TXT: &str = r#"Hello {{ name }},

Your {{ app_name }} account has been deleted. We're sorry to see you go.

The {{ app_name }} team
"#;

const ACCOUNT_DELETED_HTML: &str = r#"<html>
<body>
    <p>Hello {{ name }},</p>
    <p>Your {{ app_name }} account has been deleted. We're sorry to see you go.</p>
    <p>The {{ app_name }} team</p>
</body>
</html>
"#;

const PASSWORD_CHANGED_TXT: &str = r#"Hello {{ name }},

The password of your {{ app_name }} account was just changed. If this
wasn't you, please contact support immediately.

The {{ app_name }} team
"#;

const PASSWORD_CHANGED_HTML: &str = r#"<html>
<body>
    <p>Hello {{ name }},</p>
    <p>The password of your {{ app_name }} account was just changed. If this
    wasn't you, please contact support immediately.</p>
    <p>The {{ app_name }} team</p>
</body>
</html>
"#;

/// Build the template engine with every embedded account template
pub(crate) fn build_templates() -> Result<Tera, MailerError> {
    let mut tera = Tera::default();

    let templates = [
        ("account_created.txt", ACCOUNT_CREATED_TXT),
        ("account_created.html", ACCOUNT_CREATED_HTML),
        ("account_deleted.txt", ACCOUNT_DELETED_TXT),
        ("account_deleted.html", ACCOUNT_DELETED_HTML),
        ("password_changed.txt", PASSWORD_CHANGED_TXT),
        ("password_changed.html", PASSWORD_CHANGED_HTML),
    ];

    for (name, body) in templates {
        tera.add_raw_template(name, body)
            .map_err(|e| MailerError::Template(format!("failed to register {name}: {e}")))?;
    }

    Ok(tera)
}

/// Template context for an account email addressed to `name`
pub(crate) fn context_for(name: &str, app_name: &str) -> Context {
    let mut context = Context::new();
    context.insert("name", name);
    context.insert("app_name", app_name);
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_renders() {
        let tera = build_templates().unwrap();
        let context = context_for("Jane", "Shelfmark");

        for email in [
            AccountEmail::Created,
            AccountEmail::Deleted,
            AccountEmail::PasswordChanged,
        ] {
            let text = tera.render(&email.text_template(), &context).unwrap();
            let html = tera.render(&email.html_template(), &context).unwrap();
            assert!(text.contains("Jane"));
            assert!(html.contains("Jane"));
            assert!(text.contains("Shelfmark"));
        }
    }

    #[test]
    fn subjects_match_account_events() {
        assert_eq!(AccountEmail::Created.subject(), "account created");
        assert_eq!(AccountEmail::Deleted.subject(), "account deleted");
        assert_eq!(AccountEmail::PasswordChanged.subject(), "password changed");
    }
}
