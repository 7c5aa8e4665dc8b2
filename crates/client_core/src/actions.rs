//! Form actions: validate, mutate remotely, report one [`OperationResult`].
//!
//! Each submission walks `Idle -> Validating -> {Invalid | Submitting} -> {Succeeded | Failed}`.
//! Validation failures never reach the resource API. Every remote attempt, successful or
//! not, marks the resource's listing stale afterwards.

use serde::Serialize;
use shared::{
    domain::User,
    error::{ErrorCode, FieldErrors},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    auth::{AuthError, SessionProvider},
    validation::{validate_customer, validate_id, validate_invoice, Credentials, RawForm},
    AdminContext, RemoteError, Resource,
};

/// Uniform outcome of every mutating action, consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl OperationResult {
    /// State a form starts in before anything was submitted.
    pub fn initial() -> Self {
        Self {
            success: false,
            message: None,
            errors: None,
            code: None,
        }
    }

    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            errors: None,
            code: None,
        }
    }

    pub fn failed(code: ErrorCode, message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            errors,
            code: Some(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Invalid {
        message: String,
        errors: FieldErrors,
    },
    Submitting,
    Succeeded {
        message: String,
    },
    Failed {
        code: ErrorCode,
        message: String,
        errors: Option<FieldErrors>,
    },
}

impl SubmissionPhase {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid { .. } => "invalid",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Invalid { .. } | Self::Succeeded { .. } | Self::Failed { .. }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal submission transition from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Lifecycle of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    phase: SubmissionPhase,
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

impl Submission {
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
        }
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn begin_validation(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionPhase::Validating, |from| {
            matches!(from, SubmissionPhase::Idle)
        })
    }

    pub fn reject(
        &mut self,
        message: impl Into<String>,
        errors: FieldErrors,
    ) -> Result<(), TransitionError> {
        let next = SubmissionPhase::Invalid {
            message: message.into(),
            errors,
        };
        self.transition(next, |from| matches!(from, SubmissionPhase::Validating))
    }

    pub fn begin_submit(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionPhase::Submitting, |from| {
            matches!(from, SubmissionPhase::Validating)
        })
    }

    pub fn succeed(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        let next = SubmissionPhase::Succeeded {
            message: message.into(),
        };
        self.transition(next, |from| matches!(from, SubmissionPhase::Submitting))
    }

    pub fn fail(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        errors: Option<FieldErrors>,
    ) -> Result<(), TransitionError> {
        let next = SubmissionPhase::Failed {
            code,
            message: message.into(),
            errors,
        };
        self.transition(next, |from| matches!(from, SubmissionPhase::Submitting))
    }

    /// The result for a terminal phase; `None` while the submission is still in flight.
    pub fn result(&self) -> Option<OperationResult> {
        match &self.phase {
            SubmissionPhase::Invalid { message, errors } => Some(OperationResult::failed(
                ErrorCode::Validation,
                message.clone(),
                Some(errors.clone()),
            )),
            SubmissionPhase::Succeeded { message } => {
                Some(OperationResult::succeeded(message.clone()))
            }
            SubmissionPhase::Failed {
                code,
                message,
                errors,
            } => Some(OperationResult::failed(*code, message.clone(), errors.clone())),
            _ => None,
        }
    }

    fn transition(
        &mut self,
        next: SubmissionPhase,
        allowed_from: impl FnOnce(&SubmissionPhase) -> bool,
    ) -> Result<(), TransitionError> {
        if !allowed_from(&self.phase) {
            return Err(TransitionError {
                from: self.phase.name(),
                to: next.name(),
            });
        }
        self.phase = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Create,
    Update,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Operation {
    resource: Resource,
    verb: Verb,
}

impl Operation {
    fn new(resource: Resource, verb: Verb) -> Self {
        Self { resource, verb }
    }

    fn invalid_message(self) -> String {
        format!(
            "Missing Fields. Failed to {} {}.",
            self.verb.title(),
            self.resource.title()
        )
    }

    fn success_message(self) -> String {
        format!("{} {} successfully", self.resource.title(), self.verb.past())
    }

    fn failure_message(self) -> String {
        format!("Failed to {} {}.", self.verb.as_str(), self.resource.singular())
    }

    fn not_found_message(self) -> String {
        format!("{} not found.", self.resource.title())
    }
}

pub async fn create_invoice(ctx: &AdminContext, form: &RawForm) -> OperationResult {
    let op = Operation::new(Resource::Invoices, Verb::Create);
    let mut submission = Submission::new();
    let payload = match validated(&mut submission, op, validate_invoice(form)) {
        Ok(payload) => payload,
        Err(result) => return result,
    };
    let outcome = ctx.client.create(op.resource, &payload).await;
    settle(ctx, submission, op, outcome)
}

pub async fn update_invoice(ctx: &AdminContext, id: &str, form: &RawForm) -> OperationResult {
    let op = Operation::new(Resource::Invoices, Verb::Update);
    let mut submission = Submission::new();
    let checked = validate_id(id).and_then(|id| validate_invoice(form).map(|body| (id, body)));
    let (id, payload) = match validated(&mut submission, op, checked) {
        Ok(checked) => checked,
        Err(result) => return result,
    };
    let outcome = ctx.client.update(op.resource, &id, &payload).await;
    settle(ctx, submission, op, outcome)
}

pub async fn delete_invoice(ctx: &AdminContext, id: &str) -> OperationResult {
    delete(ctx, Resource::Invoices, id).await
}

pub async fn create_customer(ctx: &AdminContext, form: &RawForm) -> OperationResult {
    let op = Operation::new(Resource::Customers, Verb::Create);
    let mut submission = Submission::new();
    let payload = match validated(&mut submission, op, validate_customer(form)) {
        Ok(payload) => payload,
        Err(result) => return result,
    };
    let outcome = ctx.client.create(op.resource, &payload).await;
    settle(ctx, submission, op, outcome)
}

pub async fn update_customer(ctx: &AdminContext, id: &str, form: &RawForm) -> OperationResult {
    let op = Operation::new(Resource::Customers, Verb::Update);
    let mut submission = Submission::new();
    let checked = validate_id(id).and_then(|id| validate_customer(form).map(|body| (id, body)));
    let (id, payload) = match validated(&mut submission, op, checked) {
        Ok(checked) => checked,
        Err(result) => return result,
    };
    let outcome = ctx.client.update(op.resource, &id, &payload).await;
    settle(ctx, submission, op, outcome)
}

pub async fn delete_customer(ctx: &AdminContext, id: &str) -> OperationResult {
    delete(ctx, Resource::Customers, id).await
}

async fn delete(ctx: &AdminContext, resource: Resource, id: &str) -> OperationResult {
    let op = Operation::new(resource, Verb::Delete);
    let mut submission = Submission::new();
    let id = match validated(&mut submission, op, validate_id(id)) {
        Ok(id) => id,
        Err(result) => return result,
    };
    let outcome = ctx.client.delete(resource, &id).await;
    settle(ctx, submission, op, outcome)
}

/// Runs the validation phase; on success the submission is left in `Submitting`.
fn validated<T>(
    submission: &mut Submission,
    op: Operation,
    checked: Result<T, FieldErrors>,
) -> Result<T, OperationResult> {
    let step = submission.begin_validation().and_then(|()| match checked {
        Ok(value) => submission.begin_submit().map(|()| Some(value)),
        Err(errors) => {
            info!(
                resource = op.resource.path(),
                verb = op.verb.as_str(),
                fields = ?errors.fields().collect::<Vec<_>>(),
                "actions: submission rejected by validation"
            );
            submission.reject(op.invalid_message(), errors).map(|()| None)
        }
    });

    match step {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(terminal_result(submission, op)),
        Err(err) => Err(transition_failure(op, err)),
    }
}

/// Records the remote outcome, marks the listing stale and returns the result.
fn settle(
    ctx: &AdminContext,
    mut submission: Submission,
    op: Operation,
    outcome: Result<(), RemoteError>,
) -> OperationResult {
    ctx.invalidations.revalidate_path(op.resource.listing_path());

    let step = match outcome {
        Ok(()) => submission.succeed(op.success_message()),
        Err(err) => {
            warn!(
                resource = op.resource.path(),
                verb = op.verb.as_str(),
                transient = err.is_transient(),
                error = %err,
                "actions: remote mutation failed"
            );
            let message = if err.is_not_found() {
                op.not_found_message()
            } else {
                op.failure_message()
            };
            let violations = err.violations().cloned();
            submission.fail(err.code(), message, violations)
        }
    };

    match step {
        Ok(()) => terminal_result(&submission, op),
        Err(err) => transition_failure(op, err),
    }
}

fn terminal_result(submission: &Submission, op: Operation) -> OperationResult {
    submission.result().unwrap_or_else(|| {
        transition_failure(
            op,
            TransitionError {
                from: submission.phase().name(),
                to: "result",
            },
        )
    })
}

fn transition_failure(op: Operation, err: TransitionError) -> OperationResult {
    error!(
        resource = op.resource.path(),
        verb = op.verb.as_str(),
        error = %err,
        "actions: submission state machine violated"
    );
    OperationResult::failed(ErrorCode::Internal, op.failure_message(), None)
}

/// Sign-in failure as the login form shows it; the display text is the form message.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignInError {
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Something went wrong.")]
    Unavailable,
}

/// Signs in with the login form; failures collapse to one of two [`SignInError`]s.
pub async fn authenticate(
    provider: &dyn SessionProvider,
    form: &RawForm,
) -> Result<User, SignInError> {
    let credentials = Credentials::from_form(form);
    match provider.authorize(&credentials).await {
        Ok(user) => {
            info!(user_id = %user.id, "auth: signed in");
            Ok(user)
        }
        Err(AuthError::InvalidCredentials) => Err(SignInError::InvalidCredentials),
        Err(err @ AuthError::Internal(_)) => {
            error!(error = %err, "auth: sign-in failed");
            Err(SignInError::Unavailable)
        }
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
