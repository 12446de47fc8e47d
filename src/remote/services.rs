// ABOUTME: Service-specific API calls on top of the generic resource client
// ABOUTME: Slug lookup and multipart create/update carrying icon files

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Method;
use std::collections::BTreeMap;

use super::client::{Ack, CrudApi, RemoteClient, ResourceClient};
use super::models::{Envelope, Service};
use super::upload::UploadFile;
use crate::draft::Draft;
use crate::error::{ClientError, DraftError};
use crate::filter::ServiceFilter;
use crate::resource::Resource;

/// Icon files sent alongside a service draft, keyed by list position.
#[derive(Debug, Clone, Default)]
pub struct ServiceAttachments {
    pub icon: Option<UploadFile>,
    pub service_icons: BTreeMap<usize, UploadFile>,
    pub step_icons: BTreeMap<usize, UploadFile>,
}

impl ServiceAttachments {
    pub fn is_empty(&self) -> bool {
        self.icon.is_none() && self.service_icons.is_empty() && self.step_icons.is_empty()
    }

    /// Writes each file name into the icon field it belongs to: `card.icon`,
    /// `servicesOverview.services[i].icon` and `processSection.steps[i].icon`.
    pub fn stamp(&self, draft: &mut Draft) -> Result<(), DraftError> {
        if let Some(icon) = &self.icon {
            draft.set("card.icon", icon.file_name.as_str())?;
        }
        for (index, file) in &self.service_icons {
            draft.set_item_field(
                "servicesOverview.services",
                *index,
                "icon",
                file.file_name.as_str(),
            )?;
        }
        for (index, file) in &self.step_icons {
            draft.set_item_field("processSection.steps", *index, "icon", file.file_name.as_str())?;
        }
        Ok(())
    }

    /// Builds the multipart form: the stamped draft as JSON under
    /// `serviceData`, then `iconFile`, `serviceIcon_{i}` and `stepIcon_{i}` parts.
    pub fn to_form(&self, draft: &Draft) -> Result<Form, ClientError> {
        let mut draft = draft.clone();
        self.stamp(&mut draft)
            .map_err(|e| ClientError::Upload(format!("cannot attach icon: {}", e)))?;
        let service_data = serde_json::to_string(&draft)
            .map_err(|e| ClientError::Upload(format!("cannot encode service data: {}", e)))?;
        let mut form = Form::new().text("serviceData", service_data);

        if let Some(icon) = &self.icon {
            form = form.part("iconFile", icon.to_part()?);
        }
        for (index, file) in &self.service_icons {
            form = form.part(format!("serviceIcon_{}", index), file.to_part()?);
        }
        for (index, file) in &self.step_icons {
            form = form.part(format!("stepIcon_{}", index), file.to_part()?);
        }
        Ok(form)
    }
}

/// Service client. When it carries attachments, `create` and `update`
/// go out as multipart forms instead of JSON.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: ResourceClient<Service>,
    attachments: ServiceAttachments,
}

impl ServiceClient {
    pub fn new(remote: &RemoteClient) -> Self {
        Self {
            inner: remote.resource::<Service>(),
            attachments: ServiceAttachments::default(),
        }
    }

    pub fn with_attachments(mut self, attachments: ServiceAttachments) -> Self {
        self.attachments = attachments;
        self
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Envelope<Service>, ClientError> {
        let remote = self.inner.remote();
        let url = remote.url(&format!("{}/{}", Service::PATH, slug));
        remote.send(remote.request(Method::GET, &url), &url).await
    }

    pub async fn create_with_files(
        &self,
        draft: &Draft,
        attachments: &ServiceAttachments,
    ) -> Result<Ack, ClientError> {
        let remote = self.inner.remote();
        let url = remote.url(&format!("{}/create", Service::PATH));
        let form = attachments.to_form(draft)?;
        remote
            .send(remote.request(Method::POST, &url).multipart(form), &url)
            .await
    }

    pub async fn update_with_files(
        &self,
        id: &str,
        draft: &Draft,
        attachments: &ServiceAttachments,
    ) -> Result<Ack, ClientError> {
        let remote = self.inner.remote();
        let url = remote.url(&format!("{}/update/{}", Service::PATH, id));
        let form = attachments.to_form(draft)?;
        remote
            .send(remote.request(Method::PUT, &url).multipart(form), &url)
            .await
    }
}

#[async_trait]
impl CrudApi<Service> for ServiceClient {
    async fn list(
        &self,
        filter: Option<&ServiceFilter>,
    ) -> Result<Envelope<Vec<Service>>, ClientError> {
        self.inner.list(filter).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Envelope<Service>, ClientError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, draft: &Draft) -> Result<Ack, ClientError> {
        if self.attachments.is_empty() {
            self.inner.create(draft).await
        } else {
            self.create_with_files(draft, &self.attachments).await
        }
    }

    async fn update(&self, id: &str, draft: &Draft) -> Result<Ack, ClientError> {
        if self.attachments.is_empty() {
            self.inner.update(id, draft).await
        } else {
            self.update_with_files(id, draft, &self.attachments).await
        }
    }

    async fn delete(&self, id: &str) -> Result<Ack, ClientError> {
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attachments_empty_by_default() {
        assert!(ServiceAttachments::default().is_empty());
    }

    #[test]
    fn test_form_builds_with_all_parts() {
        let mut attachments = ServiceAttachments {
            icon: Some(UploadFile::new("card.svg", b"<svg/>".to_vec())),
            ..Default::default()
        };
        attachments
            .step_icons
            .insert(0, UploadFile::new("step.png", vec![0x89]).with_mime("image/png"));

        let mut draft = Service::default_draft();
        draft
            .set("processSection.steps", json!([{ "step": 1, "icon": "" }]))
            .unwrap();

        assert!(!attachments.is_empty());
        assert!(attachments.to_form(&draft).is_ok());
    }

    #[test]
    fn test_stamp_writes_file_names() {
        let mut draft = Service::default_draft();
        draft
            .set(
                "servicesOverview.services",
                json!([{ "title": "Audit", "icon": "" }, { "title": "Move", "icon": "" }]),
            )
            .unwrap();
        draft
            .set("processSection.steps", json!([{ "step": 1, "icon": "" }]))
            .unwrap();

        let mut attachments = ServiceAttachments {
            icon: Some(UploadFile::new("card.svg", vec![])),
            ..Default::default()
        };
        attachments
            .service_icons
            .insert(1, UploadFile::new("move.svg", vec![]));
        attachments
            .step_icons
            .insert(0, UploadFile::new("step1.svg", vec![]));

        attachments.stamp(&mut draft).unwrap();
        assert_eq!(draft.get_str("card.icon"), Some("card.svg"));
        assert_eq!(
            draft.get("servicesOverview.services"),
            Some(&json!([{ "title": "Audit", "icon": "" }, { "title": "Move", "icon": "move.svg" }]))
        );
        assert_eq!(
            draft.get("processSection.steps"),
            Some(&json!([{ "step": 1, "icon": "step1.svg" }]))
        );
    }

    #[test]
    fn test_form_fails_for_missing_step() {
        let mut attachments = ServiceAttachments::default();
        attachments
            .step_icons
            .insert(3, UploadFile::new("step4.svg", vec![]));

        let err = attachments.to_form(&Service::default_draft()).unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));
    }
}
