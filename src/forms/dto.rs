use serde::{Deserialize, Serialize};

use crate::{
    sanitize,
    store::{NewAdventureSubmission, NewContactSubmission},
};

/// Raw contact-form body as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub visit_date: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactPayload {
    /// Sanitized record ready for the store. Call only after validation.
    pub fn into_sanitized(self) -> NewContactSubmission {
        NewContactSubmission {
            first_name: sanitize::clean(self.first_name.as_deref()),
            last_name: sanitize::clean(self.last_name.as_deref()),
            email: sanitize::clean(self.email.as_deref()),
            phone: sanitize::clean_opt(self.phone.as_deref()),
            visit_date: sanitize::clean_opt(self.visit_date.as_deref()),
            interests: sanitize::clean_list(&self.interests),
            message: sanitize::clean_opt(self.message.as_deref()),
        }
    }
}

/// Raw package-builder body as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventurePayload {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub departure_airport: Option<String>,
    #[serde(default)]
    pub group_size: Option<i64>,
    #[serde(default)]
    pub package_ids: Vec<String>,
    #[serde(default)]
    pub accommodation_ids: Vec<String>,
    #[serde(default)]
    pub activity_ids: Vec<String>,
    #[serde(default)]
    pub additional_requests: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl AdventurePayload {
    pub fn into_sanitized(self) -> NewAdventureSubmission {
        NewAdventureSubmission {
            first_name: sanitize::clean(self.first_name.as_deref()),
            last_name: sanitize::clean(self.last_name.as_deref()),
            email: sanitize::clean(self.email.as_deref()),
            phone: sanitize::clean_opt(self.phone.as_deref()),
            start_date: sanitize::clean_opt(self.start_date.as_deref()),
            end_date: sanitize::clean_opt(self.end_date.as_deref()),
            departure_airport: sanitize::clean(self.departure_airport.as_deref()),
            group_size: self.group_size.unwrap_or_default() as i32,
            package_ids: sanitize::clean_list(&self.package_ids),
            accommodation_ids: sanitize::clean_list(&self.accommodation_ids),
            activity_ids: sanitize::clean_list(&self.activity_ids),
            additional_requests: sanitize::clean_opt(self.additional_requests.as_deref()),
            language: sanitize::clean(self.language.as_deref()),
        }
    }
}

/// Body returned by both submission endpoints on success.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: i64,
}
