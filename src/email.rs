use serde::Serialize;
use thiserror::Error;

/// Hosted relay endpoint; the service delivers `template_params` as an email
/// to the configured inbox.
pub const RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Relay account coordinates. These are public identifiers by design; the
/// relay enforces origin and rate limits on its side.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub service_id: &'static str,
    pub template_id: &'static str,
    pub public_key: &'static str,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_id: "service_m4kx2p9",
            template_id: "template_contact",
            public_key: "Jq3wJRkJbAqGzn41V",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("name or message is empty")]
    MissingFields,
    #[error("email address is not valid")]
    InvalidEmail,
}

impl FormError {
    /// Translation key for the user-facing error toast.
    pub fn message_key(&self) -> &'static str {
        match self {
            FormError::MissingFields => "contact.missingFields",
            FormError::InvalidEmail => "contact.invalidEmail",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("the email service rejected the message (status {0})")]
    Rejected(u16),
    #[error("could not reach the email service: {0}")]
    Network(String),
    #[error("email delivery is only available in the browser")]
    Unavailable,
}

/// Checked before the relay call so obviously broken input never leaves the
/// page. The subject may be empty; name, message, and a plausible email
/// address are required.
pub fn validate(message: &ContactMessage) -> Result<(), FormError> {
    if message.name.trim().is_empty() || message.message.trim().is_empty() {
        return Err(FormError::MissingFields);
    }
    if !looks_like_email(&message.email) {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

/// Shape check only: one `@`, non-empty local part, dotted domain with a
/// plausible TLD. Deliverability is the relay's problem.
fn looks_like_email(address: &str) -> bool {
    let address = address.trim();
    if address.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

fn relay_payload(config: &RelayConfig, message: &ContactMessage) -> serde_json::Value {
    serde_json::to_value(RelayPayload {
        service_id: config.service_id,
        template_id: config.template_id,
        user_id: config.public_key,
        template_params: TemplateParams {
            from_name: &message.name,
            reply_to: &message.email,
            subject: &message.subject,
            message: &message.message,
        },
    })
    .expect("relay payload is plain strings")
}

/// Deliver one contact message through the hosted relay. Failures surface to
/// the caller for a user-visible notification; nothing here retries.
pub async fn send(config: &RelayConfig, message: &ContactMessage) -> Result<(), EmailError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = relay_payload(config, message);
        let response = gloo_net::http::Request::post(RELAY_ENDPOINT)
            .json(&payload)
            .map_err(|err| EmailError::Network(err.to_string()))?
            .send()
            .await
            .map_err(|err| EmailError::Network(err.to_string()))?;
        if response.ok() {
            Ok(())
        } else {
            Err(EmailError::Rejected(response.status()))
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, message);
        Err(EmailError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "I enjoyed your projects page.".to_string(),
        }
    }

    #[test]
    fn a_complete_message_validates() {
        assert_eq!(validate(&message()), Ok(()));
    }

    #[test]
    fn subject_is_optional() {
        let mut msg = message();
        msg.subject = String::new();
        assert_eq!(validate(&msg), Ok(()));
    }

    #[test]
    fn blank_name_or_message_is_rejected() {
        let mut msg = message();
        msg.name = "   ".to_string();
        assert_eq!(validate(&msg), Err(FormError::MissingFields));

        let mut msg = message();
        msg.message = String::new();
        assert_eq!(validate(&msg), Err(FormError::MissingFields));
    }

    #[test]
    fn implausible_addresses_are_rejected() {
        for bad in [
            "",
            "plainaddress",
            "@example.com",
            "two@@example.com",
            "spaced name@example.com",
            "ada@example",
            "ada@.com",
            "ada@example.c0m",
        ] {
            let mut msg = message();
            msg.email = bad.to_string();
            assert_eq!(validate(&msg), Err(FormError::InvalidEmail), "{bad:?}");
        }
    }

    #[test]
    fn plausible_addresses_pass() {
        for good in ["ada@example.com", "a.b+tag@sub.example.org", " ada@example.io "] {
            let mut msg = message();
            msg.email = good.to_string();
            assert_eq!(validate(&msg), Ok(()), "{good:?}");
        }
    }

    #[test]
    fn relay_payload_matches_the_service_contract() {
        let config = RelayConfig::default();
        let payload = relay_payload(&config, &message());

        assert_eq!(payload["service_id"], config.service_id);
        assert_eq!(payload["template_id"], config.template_id);
        assert_eq!(payload["user_id"], config.public_key);
        assert_eq!(payload["template_params"]["from_name"], "Ada");
        assert_eq!(payload["template_params"]["reply_to"], "ada@example.com");
        assert_eq!(
            payload["template_params"]["message"],
            "I enjoyed your projects page."
        );
    }

    #[test]
    fn form_errors_map_to_translation_keys() {
        assert_eq!(
            FormError::InvalidEmail.message_key(),
            "contact.invalidEmail"
        );
        assert_eq!(
            FormError::MissingFields.message_key(),
            "contact.missingFields"
        );
    }
}
