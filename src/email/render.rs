use chrono::NaiveDate;
use minijinja::{Environment, context};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

use super::MailError;
use crate::config::{Config, EventDetails};
use crate::entities::email_campaign::TemplateType;

/// "Ada", "Ada and Byron", "Ada, Byron and Carl".
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

pub struct EmailRenderer {
    env: Environment<'static>,
    frontend_url: String,
    public_api_url: String,
    event: EventDetails,
    rsvp_deadline: Option<NaiveDate>,
}

impl EmailRenderer {
    pub fn new(config: &Config) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(config.template_dir.clone()));
        Self {
            env,
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
            public_api_url: config.public_api_url.trim_end_matches('/').to_string(),
            event: config.event.clone(),
            rsvp_deadline: config.rsvp_deadline,
        }
    }

    pub fn rsvp_link(&self, access_code: &str) -> String {
        format!(
            "{}/rsvp?code={}",
            self.frontend_url,
            utf8_percent_encode(access_code, NON_ALPHANUMERIC)
        )
    }

    pub fn tracking_pixel_url(&self, campaign_id: Uuid, invite_id: Uuid) -> String {
        format!(
            "{}/api/track/{}/{}/open.gif",
            self.public_api_url, campaign_id, invite_id
        )
    }

    /// `tracking_pixel` is omitted for previews so they never count as opens.
    pub fn render(
        &self,
        template: TemplateType,
        guest_names: &[String],
        access_code: &str,
        tracking_pixel: Option<&str>,
    ) -> Result<String, MailError> {
        let tmpl = self.env.get_template(template.template_name())?;
        let html = tmpl.render(context! {
            guest_names => join_names(guest_names),
            rsvp_link => self.rsvp_link(access_code),
            website_url => self.frontend_url,
            event_date => self.event.date,
            event_venue => self.event.venue,
            rsvp_deadline => self.rsvp_deadline.map(|d| d.format("%B %-d, %Y").to_string()),
            tracking_pixel_url => tracking_pixel,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> EmailRenderer {
        let config = Config {
            public_api_url: "http://api.test/".into(),
            rsvp_deadline: NaiveDate::from_ymd_opt(2026, 4, 30),
            ..Config::for_tests()
        };
        EmailRenderer::new(&config)
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&[]), "");
        assert_eq!(join_names(&["Ada".to_string()]), "Ada");
        assert_eq!(
            join_names(&["Ada".to_string(), "Byron".to_string()]),
            "Ada and Byron"
        );
        assert_eq!(
            join_names(&["A".to_string(), "B".to_string(), "C".to_string()]),
            "A, B and C"
        );
    }

    #[test]
    fn test_links() {
        let r = renderer();
        assert_eq!(r.rsvp_link("AB12CD34"), "http://site.test/rsvp?code=AB12CD34");
        assert_eq!(r.rsvp_link("a b"), "http://site.test/rsvp?code=a%20b");

        let campaign = Uuid::new_v4();
        let invite = Uuid::new_v4();
        assert_eq!(
            r.tracking_pixel_url(campaign, invite),
            format!("http://api.test/api/track/{campaign}/{invite}/open.gif")
        );
    }

    #[test]
    fn test_render_invitation() {
        let r = renderer();
        let names = vec!["Ada".to_string(), "Byron".to_string()];
        let html = r
            .render(
                TemplateType::Invitation,
                &names,
                "AB12CD34",
                Some("http://api.test/pixel.gif"),
            )
            .unwrap();
        assert!(html.contains("Ada and Byron"));
        assert!(html.contains("http://site.test/rsvp?code=AB12CD34"));
        assert!(html.contains("http://api.test/pixel.gif"));
        assert!(html.contains("April 30, 2026"));
    }

    #[test]
    fn test_preview_has_no_pixel() {
        let r = renderer();
        let html = r
            .render(TemplateType::SaveTheDate, &["Ada".to_string()], "AB12CD34", None)
            .unwrap();
        assert!(html.contains("Ada"));
        assert!(!html.contains("open.gif"));
    }
}
