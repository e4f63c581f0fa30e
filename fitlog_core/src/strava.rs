//! Blocking client for the Strava activity listing and token refresh.

use crate::aggregate::Activity;
use crate::config::StravaConfig;
use crate::token::TokenSet;
use crate::Result;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};

pub struct StravaClient {
    http: Client,
    api_base: String,
    per_page: u32,
    access_token: String,
}

impl StravaClient {
    pub fn new(config: &StravaConfig, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            access_token: access_token.into(),
        }
    }

    /// One page of the athlete's activities (1-based)
    pub fn fetch_page(&self, page: u32) -> Result<Vec<Activity>> {
        let url = format!("{}/athlete/activities", self.api_base);
        let activities = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .query(&[("per_page", self.per_page), ("page", page)])
            .send()?
            .error_for_status()?
            .json::<Vec<Activity>>()?;
        Ok(activities)
    }

    /// Every activity, oldest first
    pub fn fetch_all(&self) -> Result<Vec<Activity>> {
        fetch_all_pages(|page| self.fetch_page(page))
    }
}

/// Page through a listing until the first empty page, then sort by start time
pub fn fetch_all_pages<F>(mut fetch: F) -> Result<Vec<Activity>>
where
    F: FnMut(u32) -> Result<Vec<Activity>>,
{
    let mut activities = Vec::new();

    for page in 1.. {
        let batch = fetch(page)?;
        if batch.is_empty() {
            break;
        }
        tracing::debug!("Fetched page {} with {} activities", page, batch.len());
        activities.extend(batch);
    }

    activities.sort_by_key(|a| a.start_date);
    tracing::info!("Fetched {} activities", activities.len());
    Ok(activities)
}

/// Exchange the refresh token for a new token set
pub fn refresh_tokens(config: &StravaConfig, tokens: &TokenSet) -> Result<Map<String, Value>> {
    let (client_id, client_secret) = config.credentials()?;

    let response = Client::new()
        .post(&config.oauth_url)
        .header(ACCEPT, "application/json")
        .query(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", tokens.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()?
        .error_for_status()?
        .json::<Map<String, Value>>()?;

    tracing::info!("Refreshed access token");
    Ok(response)
}
