//! Supabase-backed credential store
//!
//! Queries the `admin_api_settings` table through the PostgREST endpoint for
//! the most recently created row flagged active. The proxy never writes to
//! this table.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::credentials::{CredentialSet, CredentialStore};
use crate::error::{ProxyError, Result};

const SETTINGS_TABLE: &str = "admin_api_settings";

/// Credential columns of an `admin_api_settings` row.
#[derive(Debug, Deserialize)]
struct SettingsRow {
    #[serde(default)]
    hms_management_token: Option<String>,
    #[serde(default)]
    hms_access_key: Option<String>,
    #[serde(default)]
    hms_secret: Option<String>,
}

impl From<SettingsRow> for CredentialSet {
    fn from(row: SettingsRow) -> Self {
        Self {
            management_token: row.hms_management_token.unwrap_or_default(),
            access_key: row.hms_access_key.unwrap_or_default(),
            app_secret: row.hms_secret.unwrap_or_default(),
        }
    }
}

/// PostgREST client for the admin settings table.
pub struct SupabaseSettingsStore {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseSettingsStore {
    pub fn new(config: &Config, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: config.supabase_url.clone(),
            api_key: config.supabase_anon_key.clone(),
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=hms_management_token,hms_access_key,hms_secret\
             &is_active=eq.true&order=created_at.desc&limit=1",
            self.base_url, SETTINGS_TABLE
        )
    }
}

#[async_trait]
impl CredentialStore for SupabaseSettingsStore {
    async fn fetch_latest(&self) -> Result<Option<CredentialSet>> {
        let response = self
            .http_client
            .get(self.query_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message: format!("settings query failed: {}", status),
            });
        }

        let rows: Vec<SettingsRow> = response.json().await?;
        Ok(rows.into_iter().next().map(CredentialSet::from))
    }
}
