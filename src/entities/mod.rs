pub mod access_code;
pub mod campaign_recipient;
pub mod email_campaign;
pub mod guest;
pub mod honeymoon_category;
pub mod honeymoon_item;
pub mod invite;
pub mod registry_contribution;
pub mod rsvp;
