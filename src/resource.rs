// ABOUTME: Per-resource configuration consumed by the generic client and controller
// ABOUTME: Declares paths, filters, default drafts and editable lists for each record type

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fmt::Debug;

use crate::draft::{ArrayField, Draft};
use crate::filter::{ContactFilter, JobFilter, RecordFilter, ServiceFilter, TestimonialFilter};
use crate::remote::models::{Contact, Job, Metadata, Service, Testimonial};
use crate::slug::generate_slug;

pub trait Resource: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection segment under the API base URL, e.g. `jobs`.
    const PATH: &'static str;
    /// Singular human-readable name used in prompts and notices.
    const LABEL: &'static str;
    const ARRAY_FIELDS: &'static [ArrayField] = &[];

    type Filter: RecordFilter<Self>;

    fn meta(&self) -> &Metadata;

    fn id(&self) -> &str {
        &self.meta().id
    }

    fn default_draft() -> Draft;

    /// Called after the controller writes `field` into the draft.
    fn on_field_change(_draft: &mut Draft, _field: &str, _edit_mode: bool) {}

    fn array_field(path: &str) -> Option<&'static ArrayField> {
        Self::ARRAY_FIELDS.iter().find(|field| field.path == path)
    }
}

impl Resource for Job {
    const PATH: &'static str = "jobs";
    const LABEL: &'static str = "job";
    const ARRAY_FIELDS: &'static [ArrayField] = &[
        ArrayField::list("requiredSkills"),
        ArrayField::list("responsibilities"),
    ];

    type Filter = JobFilter;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn default_draft() -> Draft {
        Draft::from_value(json!({
            "title": "",
            "location": "",
            "jobType": "",
            "experience": "",
            "openings": 1,
            "description": "",
            "requiredSkills": [],
            "responsibilities": [],
            "isActive": true
        }))
    }
}

impl Resource for Service {
    const PATH: &'static str = "services";
    const LABEL: &'static str = "service";
    const ARRAY_FIELDS: &'static [ArrayField] = &[
        ArrayField::list("servicesOverview.services"),
        ArrayField::sequence("processSection.steps", "step"),
    ];

    type Filter = ServiceFilter;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn default_draft() -> Draft {
        Draft::from_value(json!({
            "title": "",
            "slug": "",
            "card": { "shortDescription": "", "icon": "" },
            "heroSection": { "headline": "", "subHeadline": "" },
            "servicesOverview": { "title": "", "description": "", "services": [] },
            "processSection": { "title": "", "steps": [] },
            "status": "active"
        }))
    }

    // The slug follows the title only while creating; an existing slug is a
    // public URL and stays put when editing.
    fn on_field_change(draft: &mut Draft, field: &str, edit_mode: bool) {
        if edit_mode || field != "title" {
            return;
        }
        let slug = match draft.get_str("title") {
            Some(title) if !title.is_empty() => generate_slug(title),
            _ => return,
        };
        // "slug" is top-level, so this cannot fail
        let _ = draft.set("slug", slug);
    }
}

impl Resource for Testimonial {
    const PATH: &'static str = "testimonials";
    const LABEL: &'static str = "testimonial";

    type Filter = TestimonialFilter;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn default_draft() -> Draft {
        Draft::from_value(json!({
            "name": "",
            "designation": "",
            "message": "",
            "rating": 5
        }))
    }
}

impl Resource for Contact {
    const PATH: &'static str = "contacts";
    const LABEL: &'static str = "contact";

    type Filter = ContactFilter;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn default_draft() -> Draft {
        Draft::from_value(json!({
            "firstName": "",
            "lastName": "",
            "email": "",
            "phone": ""
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_default_draft() {
        let draft = Job::default_draft();
        assert_eq!(draft.get("openings"), Some(&json!(1)));
        assert_eq!(draft.get("isActive"), Some(&json!(true)));
        assert_eq!(draft.get("requiredSkills"), Some(&json!([])));
        assert_eq!(draft.get("responsibilities"), Some(&json!([])));
    }

    #[test]
    fn test_service_steps_are_a_sequence() {
        let steps = Service::array_field("processSection.steps").unwrap();
        assert_eq!(steps.sequence_key, Some("step"));
        assert!(Service::array_field("steps").is_none());
    }

    #[test]
    fn test_service_slug_follows_title_when_creating() {
        let mut draft = Service::default_draft();
        draft.set("title", "Cloud Migration & Ops").unwrap();
        Service::on_field_change(&mut draft, "title", false);
        assert_eq!(draft.get_str("slug"), Some("cloud-migration-ops"));
    }

    #[test]
    fn test_service_slug_fixed_when_editing() {
        let mut draft = Service::default_draft();
        draft.set("slug", "original").unwrap();
        draft.set("title", "Renamed").unwrap();
        Service::on_field_change(&mut draft, "title", true);
        assert_eq!(draft.get_str("slug"), Some("original"));
    }

    #[test]
    fn test_contacts_have_no_array_fields() {
        assert!(Contact::ARRAY_FIELDS.is_empty());
    }
}
