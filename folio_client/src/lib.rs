//! Browser-side contact form logic: local validation, a single submission at
//! a time and a status that falls back to idle on its own.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

pub use validation::{validate, FieldError, FieldErrors};

mod validation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ContactFormFields> for ContactApiRequest {
    fn from(value: ContactFormFields) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    /// How long `Success`/`Failure` stays visible before reverting to `Idle`.
    pub reset_delay: Duration,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactFormSubmitError {
    #[error("A submission is already in progress.")]
    AlreadySubmitting,
    #[error("The form contains invalid fields.")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct ContactForm<Api> {
    api: Api,
    config: ContactFormConfig,
    fields: Mutex<ContactFormFields>,
    status: Arc<watch::Sender<SubmitStatus>>,
    /// Incremented by every submission that reaches the network, so that
    /// revert timers of older submissions can detect they are stale.
    generation: Arc<AtomicU64>,
}

impl<Api: ContactApiService> ContactForm<Api> {
    pub fn new(api: Api, config: ContactFormConfig) -> Self {
        Self {
            api,
            config,
            fields: Default::default(),
            status: Arc::new(watch::Sender::new(SubmitStatus::Idle)),
            generation: Default::default(),
        }
    }

    pub fn fields(&self) -> ContactFormFields {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_fields(&self, fields: ContactFormFields) {
        *self.fields.lock().unwrap_or_else(PoisonError::into_inner) = fields;
    }

    pub fn status(&self) -> SubmitStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitStatus> {
        self.status.subscribe()
    }

    /// Validate the current fields and post them once. On success the form
    /// is cleared; on failure the fields are kept so the user can retry.
    pub async fn submit(&self) -> Result<(), ContactFormSubmitError> {
        if self.status() == SubmitStatus::Submitting {
            return Err(ContactFormSubmitError::AlreadySubmitting);
        }

        let fields = self.fields();
        let errors = validate(&fields);
        if !errors.is_empty() {
            debug!(?errors, "Contact form has invalid fields");
            return Err(ContactFormSubmitError::Invalid(errors));
        }

        let claimed = self.status.send_if_modified(|status| {
            if *status == SubmitStatus::Submitting {
                return false;
            }
            *status = SubmitStatus::Submitting;
            true
        });
        if !claimed {
            return Err(ContactFormSubmitError::AlreadySubmitting);
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut submission = Submission {
            form: self,
            generation,
            outcome: SubmitStatus::Failure,
        };

        let result = self.api.submit(fields.into()).await;

        match &result {
            Ok(()) => {
                self.set_fields(Default::default());
                submission.outcome = SubmitStatus::Success;
            }
            Err(err) => warn!("Failed to submit contact form: {err:#}"),
        }
        drop(submission);

        result.map_err(Into::into)
    }
}

impl<Api> ContactForm<Api> {
    fn finish(&self, outcome: SubmitStatus, generation: u64) {
        self.status.send_replace(outcome);

        // without a runtime there is no timer to revert the status with
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let status = Arc::clone(&self.status);
        let current = Arc::clone(&self.generation);
        let delay = self.config.reset_delay;

        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_if_modified(|status| {
                let finished = matches!(*status, SubmitStatus::Success | SubmitStatus::Failure);
                if !finished || current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *status = SubmitStatus::Idle;
                true
            });
        });
    }
}

/// Publishes the outcome of a claimed submission when dropped, so a submit
/// future that is cancelled mid-request ends in `Failure` instead of leaving
/// the form stuck in `Submitting`.
struct Submission<'a, Api> {
    form: &'a ContactForm<Api>,
    generation: u64,
    outcome: SubmitStatus,
}

impl<Api> Drop for Submission<'_, Api> {
    fn drop(&mut self) {
        self.form.finish(self.outcome, self.generation);
    }
}
