use chrono::NaiveDate;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: String,
    pub public_api_url: String,
    pub frontend_url: String,
    pub upload_dir: String,
    pub template_dir: String,
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub rsvp_deadline: Option<NaiveDate>,
    pub event: EventDetails,
}

/// Printed into outgoing emails.
#[derive(Clone, Debug)]
pub struct EventDetails {
    pub date: String,
    pub venue: String,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            date: "August 15, 2026".to_string(),
            venue: "Rouge, Calgary, Alberta".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set in .env file"))?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "wedding_api=debug,tower_http=debug".into());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
        let public_api_url =
            env::var("PUBLIC_API_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        let frontend_url = env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
        let template_dir = env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".into());
        let resend_api_key = env::var("RESEND_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let from_email =
            env::var("FROM_EMAIL").unwrap_or_else(|_| "contact@samandjonah.com".into());
        let rsvp_deadline = match env::var("RSVP_DEADLINE") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("RSVP_DEADLINE must be YYYY-MM-DD: {e}"))?,
            ),
            _ => None,
        };
        let defaults = EventDetails::default();
        let event = EventDetails {
            date: env::var("EVENT_DATE").unwrap_or(defaults.date),
            venue: env::var("EVENT_VENUE").unwrap_or(defaults.venue),
        };

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            public_api_url,
            frontend_url,
            upload_dir,
            template_dir,
            resend_api_key,
            from_email,
            rsvp_deadline,
            event,
        })
    }

    /// Past-deadline gate for the public RSVP form. The deadline day itself is
    /// still open.
    pub fn rsvp_closed(&self, today: NaiveDate) -> bool {
        self.rsvp_deadline.is_some_and(|deadline| today > deadline)
    }
}

#[cfg(test)]
impl Config {
    /// Points at the crate's own templates; nothing is read from the
    /// environment.
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            rust_log: "debug".into(),
            bind_addr: "127.0.0.1:0".into(),
            public_api_url: "http://api.test".into(),
            frontend_url: "http://site.test".into(),
            upload_dir: std::env::temp_dir()
                .join("wedding-api-tests")
                .to_string_lossy()
                .into_owned(),
            template_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates").into(),
            resend_api_key: None,
            from_email: "us@test".into(),
            rsvp_deadline: None,
            event: EventDetails::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_deadline(deadline: Option<NaiveDate>) -> Config {
        Config {
            rsvp_deadline: deadline,
            ..Config::for_tests()
        }
    }

    #[test]
    fn test_rsvp_closed_after_deadline_only() {
        let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        let config = config_with_deadline(Some(deadline));
        assert!(!config.rsvp_closed(NaiveDate::from_ymd_opt(2026, 4, 29).unwrap()));
        assert!(!config.rsvp_closed(deadline));
        assert!(config.rsvp_closed(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()));
    }

    #[test]
    fn test_no_deadline_never_closes() {
        let config = config_with_deadline(None);
        assert!(!config.rsvp_closed(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }
}
