// ABOUTME: Client-side narrowing of fetched collections
// ABOUTME: Per-resource filter criteria with case-insensitive matching

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::remote::models::{Contact, Job, Service, Testimonial};

/// Optional per-field criteria. An unset criterion places no constraint.
pub trait RecordFilter<R>:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync
{
    fn active_count(&self) -> usize;

    fn matches(&self, record: &R) -> bool;

    fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Returns the records that satisfy `filter`, in their original order.
pub fn filter_records<R: Clone, F: RecordFilter<R>>(records: &[R], filter: &F) -> Vec<R> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

fn text_criterion(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn text_matches(criterion: &Option<String>, value: &str) -> bool {
    text_criterion(criterion).map_or(true, |needle| contains_ci(value, needle))
}

fn count_set(criteria: &[bool]) -> usize {
    criteria.iter().filter(|set| **set).count()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl RecordFilter<Job> for JobFilter {
    fn active_count(&self) -> usize {
        count_set(&[
            text_criterion(&self.title).is_some(),
            text_criterion(&self.location).is_some(),
            text_criterion(&self.job_type).is_some(),
        ])
    }

    fn matches(&self, job: &Job) -> bool {
        text_matches(&self.title, &job.title)
            && text_matches(&self.location, &job.location)
            && text_matches(&self.job_type, &job.job_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceFilter {
    pub title: Option<String>,
    pub status: Option<String>,
}

impl RecordFilter<Service> for ServiceFilter {
    fn active_count(&self) -> usize {
        count_set(&[
            text_criterion(&self.title).is_some(),
            text_criterion(&self.status).is_some(),
        ])
    }

    fn matches(&self, service: &Service) -> bool {
        text_matches(&self.title, &service.title)
            && text_criterion(&self.status)
                .map_or(true, |status| status.eq_ignore_ascii_case(&service.status))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialFilter {
    pub name: Option<String>,
    pub designation: Option<String>,
    /// Zero counts as unset.
    pub rating: Option<u8>,
}

impl TestimonialFilter {
    fn rating_criterion(&self) -> Option<u8> {
        self.rating.filter(|rating| *rating != 0)
    }
}

impl RecordFilter<Testimonial> for TestimonialFilter {
    fn active_count(&self) -> usize {
        count_set(&[
            text_criterion(&self.name).is_some(),
            text_criterion(&self.designation).is_some(),
            self.rating_criterion().is_some(),
        ])
    }

    fn matches(&self, testimonial: &Testimonial) -> bool {
        text_matches(&self.name, &testimonial.name)
            && text_matches(&self.designation, &testimonial.designation)
            && self
                .rating_criterion()
                .map_or(true, |rating| rating == testimonial.rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContactFilter {
    fn date_matches(&self, contact: &Contact) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(created) = contact.meta.created_at.map(|at| at.date_naive()) else {
            return false;
        };
        self.start_date.map_or(true, |start| created >= start)
            && self.end_date.map_or(true, |end| created <= end)
    }
}

impl RecordFilter<Contact> for ContactFilter {
    fn active_count(&self) -> usize {
        count_set(&[
            text_criterion(&self.name).is_some(),
            text_criterion(&self.email).is_some(),
            self.start_date.is_some(),
            self.end_date.is_some(),
        ])
    }

    fn matches(&self, contact: &Contact) -> bool {
        text_matches(&self.name, &contact.full_name())
            && text_matches(&self.email, &contact.email)
            && self.date_matches(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::models::Metadata;
    use chrono::{TimeZone, Utc};

    fn job(id: &str, title: &str, location: &str, job_type: &str) -> Job {
        Job {
            meta: Metadata::new(id),
            title: title.to_string(),
            location: location.to_string(),
            job_type: job_type.to_string(),
            experience: String::new(),
            openings: 1,
            description: String::new(),
            required_skills: vec![],
            responsibilities: vec![],
            is_active: true,
        }
    }

    fn testimonial(id: &str, name: &str, rating: u8) -> Testimonial {
        Testimonial {
            meta: Metadata::new(id),
            name: name.to_string(),
            designation: "CTO".to_string(),
            message: String::new(),
            rating,
        }
    }

    fn contact(id: &str, first: &str, last: &str, day: u32) -> Contact {
        let mut meta = Metadata::new(id);
        meta.created_at = Some(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap());
        Contact {
            meta,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: String::new(),
        }
    }

    #[test]
    fn test_title_substring_is_case_insensitive() {
        let jobs = vec![
            job("1", "Software Engineer", "Remote", "Full-time"),
            job("2", "Designer", "Berlin", "Contract"),
        ];
        let filter = JobFilter {
            title: Some("engineer".to_string()),
            ..Default::default()
        };

        let matched = filter_records(&jobs, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].meta.id, "1");
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let jobs = vec![
            job("1", "B", "", ""),
            job("2", "A", "", ""),
            job("3", "C", "", ""),
        ];
        let filter = JobFilter::default();

        assert!(filter.is_empty());
        assert_eq!(filter_records(&jobs, &filter), jobs);
    }

    #[test]
    fn test_empty_string_counts_as_unset() {
        let filter = JobFilter {
            title: Some(String::new()),
            location: Some("remote".to_string()),
            job_type: None,
        };
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn test_all_criteria_must_match() {
        let jobs = vec![
            job("1", "Software Engineer", "Remote", "Full-time"),
            job("2", "Software Engineer", "Berlin", "Full-time"),
        ];
        let filter = JobFilter {
            title: Some("software".to_string()),
            location: Some("BERLIN".to_string()),
            job_type: Some("full".to_string()),
        };

        let matched = filter_records(&jobs, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].meta.id, "2");
    }

    #[test]
    fn test_rating_is_exact() {
        let testimonials = vec![
            testimonial("1", "Ada", 5),
            testimonial("2", "Grace", 4),
            testimonial("3", "Linus", 5),
        ];
        let filter = TestimonialFilter {
            rating: Some(5),
            ..Default::default()
        };

        let ids: Vec<_> = filter_records(&testimonials, &filter)
            .into_iter()
            .map(|t| t.meta.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_zero_rating_is_unset() {
        let filter = TestimonialFilter {
            rating: Some(0),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&testimonial("1", "Ada", 3)));
    }

    #[test]
    fn test_contact_name_spans_first_and_last() {
        let filter = ContactFilter {
            name: Some("ada love".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&contact("1", "Ada", "Lovelace", 1)));
        assert!(!filter.matches(&contact("2", "Grace", "Hopper", 1)));
    }

    #[test]
    fn test_contact_date_range_is_inclusive() {
        let contacts = vec![
            contact("1", "A", "A", 1),
            contact("2", "B", "B", 10),
            contact("3", "C", "C", 20),
        ];
        let filter = ContactFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 10),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 20),
            ..Default::default()
        };

        let ids: Vec<_> = filter_records(&contacts, &filter)
            .into_iter()
            .map(|c| c.meta.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_contact_without_timestamp_fails_date_range() {
        let mut undated = contact("1", "A", "A", 1);
        undated.meta.created_at = None;
        let filter = ContactFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(!filter.matches(&undated));
    }

    #[test]
    fn test_filter_deserializes_from_camel_case() {
        let filter: JobFilter =
            serde_json::from_value(serde_json::json!({ "jobType": "contract" })).unwrap();
        assert_eq!(filter.job_type.as_deref(), Some("contract"));
    }
}
