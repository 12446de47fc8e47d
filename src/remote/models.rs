// ABOUTME: Data structures for backend records and the response envelope
// ABOUTME: These are deserialized from JSON returned by the admin REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper every backend response arrives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: f(self.data),
            message: self.message,
        }
    }
}

/// Server-assigned fields shared by every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "__v", default)]
    pub revision: Option<u32>,
}

impl Metadata {
    pub const KEYS: [&'static str; 4] = ["_id", "createdAt", "updatedAt", "__v"];

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            revision: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(flatten)]
    pub meta: Metadata,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub openings: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub meta: Metadata,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub card: Card,
    #[serde(default)]
    pub hero_section: HeroSection,
    #[serde(default)]
    pub services_overview: ServicesOverview,
    #[serde(default)]
    pub process_section: ProcessSection,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub sub_headline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesOverview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<OverviewItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub steps: Vec<ProcessStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub step: u32, // 1-indexed, matches position
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(flatten)]
    pub meta: Metadata,
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(flatten)]
    pub meta: Metadata,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_from_backend_json() {
        let job: Job = serde_json::from_value(json!({
            "_id": "abc123",
            "title": "Software Engineer",
            "location": "Remote",
            "jobType": "Full-time",
            "experience": "3+ years",
            "openings": 2,
            "description": "Build things",
            "requiredSkills": ["Rust"],
            "responsibilities": [],
            "isActive": true,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(job.meta.id, "abc123");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.required_skills, vec!["Rust".to_string()]);
        assert_eq!(job.meta.revision, Some(0));
        assert!(job.meta.created_at.is_some());
    }

    #[test]
    fn test_service_nested_sections() {
        let service: Service = serde_json::from_value(json!({
            "_id": "s1",
            "title": "Cloud Migration",
            "slug": "cloud-migration",
            "card": { "shortDescription": "Move it", "icon": "cloud.svg" },
            "heroSection": { "headline": "Up", "subHeadline": "and away" },
            "servicesOverview": {
                "title": "What we do",
                "description": "",
                "services": [{ "title": "Audit", "description": "", "icon": "" }]
            },
            "processSection": {
                "title": "How",
                "steps": [{ "step": 1, "title": "Plan", "icon": "" }]
            },
            "status": "active"
        }))
        .unwrap();

        assert_eq!(service.card.icon, "cloud.svg");
        assert_eq!(service.hero_section.sub_headline, "and away");
        assert_eq!(service.services_overview.services.len(), 1);
        assert_eq!(service.process_section.steps[0].step, 1);
    }

    #[test]
    fn test_envelope_message_is_optional() {
        let envelope: Envelope<Vec<Testimonial>> =
            serde_json::from_value(json!({ "success": true, "data": [] })).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_none());
    }
}
