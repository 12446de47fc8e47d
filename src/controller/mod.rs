// ABOUTME: List/edit controller shared by every resource type
// ABOUTME: Owns the filtered list, the selection and the draft, and drives the CRUD client

pub mod confirm;

pub use confirm::{AssumeYes, Confirm, PromptConfirm};

use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::draft::Draft;
use crate::error::{ClientError, DraftError};
use crate::filter::RecordFilter;
use crate::notice::{NoticeBoard, DEFAULT_NOTICE_TTL};
use crate::remote::client::CrudApi;
use crate::remote::models::Envelope;
use crate::remote::upload::{UploadFile, Uploader};
use crate::resource::Resource;

/// How a controller operation ended. Failures have already been logged and
/// turned into an error notice by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// The user declined the confirmation step.
    Cancelled,
    /// A newer load was issued before this one finished; its response was dropped.
    Superseded,
}

/// Sequence number of an issued list load. Only the newest ticket may
/// replace the held collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ListController<R: Resource, A> {
    api: A,
    filter: R::Filter,
    items: Vec<R>,
    selected: Option<R>,
    draft: Option<Draft>,
    /// Id of the record the draft was opened from; `None` while creating.
    editing: Option<String>,
    loading: bool,
    issued: u64,
    notices: NoticeBoard,
}

impl<R: Resource, A: CrudApi<R>> ListController<R, A> {
    pub fn new(api: A) -> Self {
        Self::with_notice_ttl(api, DEFAULT_NOTICE_TTL)
    }

    pub fn with_notice_ttl(api: A, notice_ttl: Duration) -> Self {
        Self {
            api,
            filter: R::Filter::default(),
            items: Vec::new(),
            selected: None,
            draft: None,
            editing: None,
            loading: false,
            issued: 0,
            notices: NoticeBoard::new(notice_ttl),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut R::Filter {
        &mut self.filter
    }

    pub fn is_filter_applied(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn active_filter_count(&self) -> usize {
        self.filter.active_count()
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket(self.issued)
    }

    /// Applies a list response. Responses for anything but the most recently
    /// issued ticket are discarded, whatever order they arrive in.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Envelope<Vec<R>>, ClientError>,
    ) -> Outcome {
        if ticket.0 != self.issued {
            debug!(
                resource = R::PATH,
                ticket = ticket.0,
                latest = self.issued,
                "dropping superseded list response"
            );
            return Outcome::Superseded;
        }
        self.loading = false;

        match result.and_then(accepted) {
            Ok(envelope) => {
                debug!(resource = R::PATH, count = envelope.data.len(), "list loaded");
                self.items = envelope.data;
                Outcome::Completed
            }
            Err(e) => {
                self.report(format!("Error loading {}s", R::LABEL), &e);
                Outcome::Failed
            }
        }
    }

    pub async fn load_list(&mut self) -> Outcome {
        let ticket = self.begin_load();
        let result = self.api.list(Some(&self.filter)).await;
        self.finish_load(ticket, result)
    }

    pub async fn apply_filter(&mut self) -> Outcome {
        self.load_list().await
    }

    pub async fn reset_filter(&mut self) -> Outcome {
        self.filter = R::Filter::default();
        self.load_list().await
    }

    /// Shows `record` without touching the draft or the record being edited.
    pub fn select_for_view(&mut self, record: R) {
        self.selected = Some(record);
    }

    pub fn select_for_edit(&mut self, record: R) -> Outcome {
        match Draft::from_record(&record) {
            Ok(draft) => {
                self.editing = Some(record.id().to_string());
                self.selected = Some(record);
                self.draft = Some(draft);
                Outcome::Completed
            }
            Err(e) => {
                self.report(format!("Error opening {} for editing", R::LABEL), &e);
                Outcome::Failed
            }
        }
    }

    /// Loads a single record from the backend and opens it for editing.
    pub async fn fetch_for_edit(&mut self, id: &str) -> Outcome {
        // an outstanding list ticket keeps the flag set until it finishes
        let list_pending = self.loading;
        self.loading = true;
        let result = self.api.get_by_id(id).await.and_then(accepted);
        self.loading = list_pending;

        match result {
            Ok(envelope) => self.select_for_edit(envelope.data),
            Err(e) => {
                self.report(format!("Error loading {}", R::LABEL), &e);
                Outcome::Failed
            }
        }
    }

    pub fn start_create(&mut self) {
        self.selected = None;
        self.editing = None;
        self.draft = Some(R::default_draft());
    }

    /// Discards the draft and the selection without saving.
    pub fn cancel(&mut self) {
        self.reset_form();
    }

    /// Writes `value` at `path`. Replacing a sequence, or an object holding
    /// one, renumbers its items.
    pub fn set_field(&mut self, path: &str, value: impl Into<Value>) -> Result<(), DraftError> {
        let draft = self.draft.as_mut().ok_or(DraftError::NoDraft)?;
        draft.set(path, value)?;
        for field in R::ARRAY_FIELDS {
            if covers(path, field.path) {
                draft.renumber(field);
            }
        }
        R::on_field_change(draft, path, self.editing.is_some());
        Ok(())
    }

    pub fn add_array_item(&mut self, field: &str, value: impl Into<Value>) -> Result<bool, DraftError> {
        let descriptor =
            R::array_field(field).ok_or_else(|| DraftError::UnknownArrayField(field.to_string()))?;
        let draft = self.draft.as_mut().ok_or(DraftError::NoDraft)?;
        draft.push(descriptor, value.into())
    }

    pub fn remove_array_item(&mut self, field: &str, index: usize) -> Result<Value, DraftError> {
        let descriptor =
            R::array_field(field).ok_or_else(|| DraftError::UnknownArrayField(field.to_string()))?;
        let draft = self.draft.as_mut().ok_or(DraftError::NoDraft)?;
        draft.remove(descriptor, index)
    }

    /// Uploads `file` and stores the returned URL at `path` in the draft.
    pub async fn attach<U: Uploader + ?Sized>(
        &mut self,
        path: &str,
        file: &UploadFile,
        uploader: &U,
    ) -> Outcome {
        if self.draft.is_none() {
            self.report(format!("Error attaching {}", file.file_name), &DraftError::NoDraft);
            return Outcome::Failed;
        }

        let stored = match uploader.upload(file).await {
            Ok(url) => url,
            Err(e) => {
                self.report(format!("Error uploading {}", file.file_name), &e);
                return Outcome::Failed;
            }
        };

        match self.set_field(path, stored) {
            Ok(()) => Outcome::Completed,
            Err(e) => {
                self.report(format!("Error attaching {}", file.file_name), &e);
                Outcome::Failed
            }
        }
    }

    /// Sends the draft as an update (edit mode) or a create. The draft is
    /// cleared only once the backend confirms; on failure it is kept for retry.
    pub async fn submit(&mut self) -> Outcome {
        let target = self.editing.clone();
        let (verb, done) = match target {
            Some(_) => ("updating", "updated"),
            None => ("creating", "created"),
        };

        let Some(draft) = self.draft.as_ref() else {
            self.report(format!("Error {} {}", verb, R::LABEL), &DraftError::NoDraft);
            return Outcome::Failed;
        };

        let list_pending = self.loading;
        self.loading = true;
        let result = match target.as_deref() {
            Some(id) => self.api.update(id, draft).await,
            None => self.api.create(draft).await,
        };

        match result.and_then(accepted) {
            Ok(_) => {
                info!(resource = R::PATH, id = target.as_deref(), "{} {}", R::LABEL, done);
                self.reset_form();
                self.notices
                    .success(format!("{} {} successfully", capitalize(R::LABEL), done));
                self.load_list().await;
                Outcome::Completed
            }
            Err(e) => {
                self.loading = list_pending;
                self.report(format!("Error {} {}", verb, R::LABEL), &e);
                Outcome::Failed
            }
        }
    }

    /// Deletes a record after `confirm` agrees. Nothing is removed locally
    /// until the backend confirms and the list is reloaded.
    pub async fn delete_record<C: Confirm + ?Sized>(&mut self, id: &str, confirm: &C) -> Outcome {
        let prompt = format!("Are you sure you want to delete this {}?", R::LABEL);
        if !confirm.confirm(&prompt) {
            info!(resource = R::PATH, id, "delete cancelled");
            return Outcome::Cancelled;
        }

        match self.api.delete(id).await.and_then(accepted) {
            Ok(_) => {
                info!(resource = R::PATH, id, "{} deleted", R::LABEL);
                self.notices
                    .success(format!("{} deleted successfully", capitalize(R::LABEL)));
                self.load_list().await;
                Outcome::Completed
            }
            Err(e) => {
                self.report(format!("Error deleting {}", R::LABEL), &e);
                Outcome::Failed
            }
        }
    }

    fn report(&mut self, context: String, err: &dyn Display) {
        error!("{}: {}", context, err);
        self.notices.error(context);
    }

    fn reset_form(&mut self) {
        self.selected = None;
        self.editing = None;
        self.draft = None;
    }
}

fn accepted<T>(envelope: Envelope<T>) -> Result<Envelope<T>, ClientError> {
    if envelope.success {
        Ok(envelope)
    } else {
        Err(ClientError::rejected(envelope.message.as_deref()))
    }
}

/// True when writing `path` replaces `field` or one of its ancestors.
fn covers(path: &str, field: &str) -> bool {
    field == path
        || field
            .strip_prefix(path)
            .map_or(false, |rest| rest.starts_with('.'))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
