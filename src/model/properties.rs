//! Document properties from docProps/core.xml and docProps/app.xml.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core and extended (app) document properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProperties {
    /// Document author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Last modified by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,

    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Document description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Keywords, as stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// Last modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    /// Application that produced the document (app.xml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// Company (app.xml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Manager (app.xml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}
