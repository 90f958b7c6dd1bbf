// src/records.rs
//! Domain objects kept inside the encrypted collections
//!
//! Each collection is a `Vec` of one of these, serialized as a single JSON
//! document. Field names follow the dashboard's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved site login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub id: String,
    pub site: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An identity profile used for form filling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityEntry {
    pub id: String,
    pub label: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEntry {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub visited_at: DateTime<Utc>,
}

/// An image moved out of the regular gallery
///
/// `data` is the base64 image body exactly as the dashboard supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenPhoto {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub data: String,
    pub added_at: DateTime<Utc>,
}

pub type Credentials = Vec<CredentialEntry>;
pub type Identities = Vec<IdentityEntry>;
pub type History = Vec<VisitEntry>;
pub type HiddenPhotos = Vec<HiddenPhoto>;
