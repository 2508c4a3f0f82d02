//! Read-only reference material: Schedule K-1 boxes and partnership tax cases.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoxExample {
    pub scenario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct K1Box {
    pub id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    #[serde(default)]
    pub examples: Vec<BoxExample>,
    #[serde(default)]
    pub related_boxes: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Keyed for K1Box {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Titled for K1Box {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxCase {
    pub id: String,
    pub title: String,
    pub citation: String,
    pub year: u16,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub impact: String,
}

impl Keyed for TaxCase {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Titled for TaxCase {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Displayable for TaxCase {
    fn display_label(&self) -> String {
        format!("{} ({}), {}", self.title, self.year, self.citation)
    }
}
