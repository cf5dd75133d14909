//! Directory adapter: one awaitable load per device enumeration.
//!
//! # Responsibility
//! - Call the device source once per load with the fixed attribute set.
//! - Map raw tuples into `Contact` records in the order received.
//! - Turn the success/error callback pair into a single `Result`.
//!
//! # Invariants
//! - Records are never reordered here; ordering belongs to the store.
//! - A failed load yields no records at all (no partial result).
//! - Whichever callback fires first decides the outcome; later ones are dropped.

use crate::directory::source::{ContactSource, FindOptions, SourceError, CONTACT_FIELDS};
use crate::model::contact::Contact;
use crate::model::raw::RawContact;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Callback invoked with every successfully completed load operation.
pub type CompletionHook = Arc<dyn Fn(&LoadOperation) + Send + Sync>;

type SourceOutcome = Result<Vec<RawContact>, SourceError>;
type OutcomeSlot = Arc<Mutex<Option<oneshot::Sender<SourceOutcome>>>>;

/// Progress of one load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Successful,
    Failed,
}

/// One request/response cycle against the device directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOperation {
    id: Uuid,
    status: LoadStatus,
    completed: bool,
    records: Vec<Contact>,
    skipped: usize,
}

impl LoadOperation {
    fn pending() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: LoadStatus::Pending,
            completed: false,
            records: Vec::new(),
            skipped: 0,
        }
    }

    /// Correlation id used in diagnostics.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_successful(&self) -> bool {
        self.status == LoadStatus::Successful
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Records in the order the device reported them.
    pub fn records(&self) -> &[Contact] {
        &self.records
    }

    /// Number of raw tuples dropped because their id was not an integer.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_records(self) -> Vec<Contact> {
        self.records
    }

    fn succeed(&mut self, records: Vec<Contact>, skipped: usize) {
        self.records = records;
        self.skipped = skipped;
        self.status = LoadStatus::Successful;
        self.completed = true;
    }

    fn fail(&mut self) {
        self.status = LoadStatus::Failed;
    }
}

/// Directory load failure (`DirectoryLoadFailed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The device reported an error through its error callback.
    LoadFailed {
        operation_id: Uuid,
        source: SourceError,
    },
    /// The device released both callbacks without invoking either.
    CallbacksDropped { operation_id: Uuid },
    /// No callback fired within the configured load timeout.
    TimedOut { operation_id: Uuid, after_ms: u128 },
}

impl DirectoryError {
    pub fn operation_id(&self) -> Uuid {
        match self {
            Self::LoadFailed { operation_id, .. }
            | Self::CallbacksDropped { operation_id }
            | Self::TimedOut { operation_id, .. } => *operation_id,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "source_error",
            Self::CallbacksDropped { .. } => "callbacks_dropped",
            Self::TimedOut { .. } => "timeout",
        }
    }
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed { source, .. } => write!(f, "contact directory load failed: {source}"),
            Self::CallbacksDropped { .. } => {
                write!(f, "contact directory released the load without answering")
            }
            Self::TimedOut { after_ms, .. } => {
                write!(f, "contact directory did not answer within {after_ms} ms")
            }
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LoadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Adapter from the callback-based device source to awaitable loads.
pub struct DirectoryAdapter {
    source: Arc<dyn ContactSource>,
    options: FindOptions,
    timeout: Option<Duration>,
    on_complete: Option<CompletionHook>,
}

impl DirectoryAdapter {
    pub fn new(source: Arc<dyn ContactSource>) -> Self {
        Self {
            source,
            options: FindOptions::default(),
            timeout: None,
            on_complete: None,
        }
    }

    /// Fails loads that receive no callback within `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Registers a callback run after every successful load.
    pub fn with_completion_hook(mut self, hook: CompletionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    /// Enumerates the device directory once.
    ///
    /// # Errors
    /// - `LoadFailed` when the source reports an error.
    /// - `CallbacksDropped` when the source never answers and drops its callbacks.
    /// - `TimedOut` when a timeout is configured and expires first.
    pub async fn load(&self) -> Result<LoadOperation, DirectoryError> {
        let mut operation = LoadOperation::pending();
        let (sender, receiver) = oneshot::channel::<SourceOutcome>();
        let success_slot: OutcomeSlot = Arc::new(Mutex::new(Some(sender)));
        let error_slot = Arc::clone(&success_slot);
        let operation_id = operation.id();

        self.source.find(
            CONTACT_FIELDS,
            &self.options,
            Box::new(move |contacts| deliver(&success_slot, Ok(contacts), operation_id)),
            Box::new(move |err| deliver(&error_slot, Err(err), operation_id)),
        );

        let received = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, receiver).await {
                Ok(received) => received,
                Err(_) => {
                    return Err(self.fail(
                        &mut operation,
                        DirectoryError::TimedOut {
                            operation_id,
                            after_ms: limit.as_millis(),
                        },
                    ));
                }
            },
            None => receiver.await,
        };

        let raw = match received {
            Ok(Ok(raw)) => raw,
            Ok(Err(source)) => {
                return Err(self.fail(
                    &mut operation,
                    DirectoryError::LoadFailed {
                        operation_id,
                        source,
                    },
                ));
            }
            Err(_) => {
                return Err(self.fail(
                    &mut operation,
                    DirectoryError::CallbacksDropped { operation_id },
                ));
            }
        };

        let (records, skipped) = map_raw_contacts(&raw, operation_id);
        operation.succeed(records, skipped);
        info!(
            "event=contacts_loaded module=directory status=ok operation={} count={} skipped={}",
            operation_id,
            operation.records().len(),
            skipped
        );

        if let Some(hook) = &self.on_complete {
            hook(&operation);
        }
        Ok(operation)
    }

    fn fail(&self, operation: &mut LoadOperation, err: DirectoryError) -> DirectoryError {
        operation.fail();
        error!(
            "event=directory_load_failed module=directory status=error operation={} reason={} message={}",
            operation.id(),
            err.reason(),
            err
        );
        err
    }
}

fn deliver(slot: &OutcomeSlot, outcome: SourceOutcome, operation_id: Uuid) {
    let sender = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    match sender {
        // Receiver may be gone after a timeout; the late answer is discarded.
        Some(sender) => {
            let _ = sender.send(outcome);
        }
        None => warn!(
            "event=duplicate_callback module=directory status=ignored operation={}",
            operation_id
        ),
    }
}

fn map_raw_contacts(raw: &[RawContact], operation_id: Uuid) -> (Vec<Contact>, usize) {
    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (position, tuple) in raw.iter().enumerate() {
        match tuple.to_contact() {
            Ok(contact) => records.push(contact),
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=contact_skipped module=directory status=warn operation={} position={} reason={}",
                    operation_id, position, err
                );
            }
        }
    }
    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::{DirectoryAdapter, DirectoryError, LoadStatus};
    use crate::directory::source::{
        ContactSource, ErrorCallback, FindOptions, FixtureSource, SourceError, SuccessCallback,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Source that records the request and never answers.
    #[derive(Default)]
    struct SilentSource {
        requests: Mutex<Vec<(Vec<String>, bool)>>,
        keep_callbacks: bool,
        parked: Mutex<Vec<(SuccessCallback, ErrorCallback)>>,
    }

    impl ContactSource for SilentSource {
        fn find(
            &self,
            fields: &[&str],
            options: &FindOptions,
            on_success: SuccessCallback,
            on_error: ErrorCallback,
        ) {
            let fields = fields.iter().map(|field| field.to_string()).collect();
            let mut requests = self.requests.lock().expect("lock");
            requests.push((fields, options.multiple));
            if self.keep_callbacks {
                let mut parked = self.parked.lock().expect("lock");
                parked.push((on_success, on_error));
            }
        }
    }

    /// Source that fires both callbacks, success first.
    struct ChattySource;

    impl ContactSource for ChattySource {
        fn find(
            &self,
            _fields: &[&str],
            _options: &FindOptions,
            on_success: SuccessCallback,
            on_error: ErrorCallback,
        ) {
            on_success(Vec::new());
            on_error(SourceError::new("late error"));
        }
    }

    #[tokio::test]
    async fn requests_fixed_attributes_with_multiple_results() {
        let source = Arc::new(SilentSource::default());
        let adapter = DirectoryAdapter::new(source.clone());

        let err = adapter
            .load()
            .await
            .expect_err("dropped callbacks should fail");
        assert!(matches!(err, DirectoryError::CallbacksDropped { .. }));

        let requests = source.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, vec!["id", "name", "emails", "phoneNumbers"]);
        assert!(requests[0].1);
    }

    #[tokio::test]
    async fn keeps_device_order_and_marks_operation_completed() {
        let source = FixtureSource::from_json_str(
            r#"[
                {"id": 1, "name": {"familyName": "Suzuki"}},
                {"id": 2, "name": {"familyName": "Abe"}}
            ]"#,
        )
        .expect("fixture json");
        let adapter = DirectoryAdapter::new(Arc::new(source));

        let operation = adapter.load().await.expect("load should succeed");
        assert_eq!(operation.status(), LoadStatus::Successful);
        assert!(operation.is_completed());
        let ids: Vec<_> = operation.records().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn skips_tuples_with_non_integer_ids() {
        let source = FixtureSource::from_json_str(
            r#"[
                {"id": "x"},
                {"id": null, "name": {"familyName": "Null"}},
                {"id": 2.5},
                {"name": {"familyName": "Missing"}},
                {"id": "5"},
                {"id": 6, "phoneNumbers": [null, {"type": "home", "value": "111"}]}
            ]"#,
        )
        .expect("one bad tuple must not reject the fixture");
        let adapter = DirectoryAdapter::new(Arc::new(source));

        let operation = adapter.load().await.expect("load should succeed");
        assert_eq!(operation.skipped(), 4);
        let ids: Vec<_> = operation.records().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![5, 6]);
        assert_eq!(operation.records()[1].phone_numbers().len(), 1);
    }

    #[tokio::test]
    async fn error_callback_fails_the_load() {
        let source = FixtureSource::failing(SourceError::new("permission denied"));
        let adapter = DirectoryAdapter::new(Arc::new(source));

        let err = adapter
            .load()
            .await
            .expect_err("error callback should fail");
        match err {
            DirectoryError::LoadFailed { source, .. } => {
                assert_eq!(source.message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn first_callback_wins() {
        let adapter = DirectoryAdapter::new(Arc::new(ChattySource));
        let operation = adapter.load().await.expect("success fired first");
        assert!(operation.is_successful());
    }

    #[tokio::test]
    async fn times_out_when_source_never_answers() {
        let source = Arc::new(SilentSource {
            keep_callbacks: true,
            ..SilentSource::default()
        });
        let timeout = Duration::from_millis(10);
        let adapter = DirectoryAdapter::new(source).with_timeout(timeout);

        let err = adapter
            .load()
            .await
            .expect_err("silent source should time out");
        assert!(matches!(err, DirectoryError::TimedOut { after_ms: 10, .. }));
    }

    #[tokio::test]
    async fn completion_hook_runs_once_per_successful_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let adapter = DirectoryAdapter::new(Arc::new(FixtureSource::desktop_debug()))
            .with_completion_hook(Arc::new(move |operation| {
                assert!(operation.is_completed());
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        adapter.load().await.expect("first load");
        adapter.load().await.expect("second load");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
