use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization profile as shown on the HR settings page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "OrganizationURL")]
    pub organization_url: String,
    #[serde(rename = "OrganizationMail")]
    pub organization_mail: String,
    pub policies: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "OrganizationURL", skip_serializing_if = "Option::is_none")]
    pub organization_url: Option<String>,
    #[serde(rename = "OrganizationMail", skip_serializing_if = "Option::is_none")]
    pub organization_mail: Option<String>,
    pub policies: Option<String>,
}
