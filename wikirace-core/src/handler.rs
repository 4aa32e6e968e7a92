use crate::diagram::{DiagramRegion, draw_solution};
use crate::view::{ResultsRegion, Summary};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};
use wikirace_client::{SearchRequest, SearchResponse, SolveClient, SolveError};

/// Source of the three form values, read once per submission.
pub trait FormInputs {
    fn start(&self) -> String;
    fn end(&self) -> String;
    fn algorithm(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub start: String,
    pub end: String,
    pub algorithm: String,
}

impl FormFields {
    pub fn new(start: &str, end: &str, algorithm: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            algorithm: algorithm.to_string(),
        }
    }
}

impl FormInputs for FormFields {
    fn start(&self) -> String {
        self.start.clone()
    }

    fn end(&self) -> String {
        self.end.clone()
    }

    fn algorithm(&self) -> String {
        self.algorithm.clone()
    }
}

/// Form whose fields can be edited while a handler holds it.
#[derive(Debug, Clone, Default)]
pub struct SharedForm {
    fields: Arc<RwLock<FormFields>>,
}

impl SharedForm {
    pub fn new(fields: FormFields) -> Self {
        Self {
            fields: Arc::new(RwLock::new(fields)),
        }
    }

    pub fn snapshot(&self) -> FormFields {
        self.fields
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update(&self, edit: impl FnOnce(&mut FormFields)) {
        let mut fields = self
            .fields
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        edit(&mut fields);
    }
}

impl FormInputs for SharedForm {
    fn start(&self) -> String {
        self.snapshot().start
    }

    fn end(&self) -> String {
        self.snapshot().end
    }

    fn algorithm(&self) -> String {
        self.snapshot().algorithm
    }
}

/// A form submission. Whoever dispatches it may check afterwards whether the
/// default action (page navigation) was suppressed.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Submitting = 1,
    Rendered = 2,
    Failed = 3,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::Submitting,
            2 => Phase::Rendered,
            3 => Phase::Failed,
            _ => Phase::Idle,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered {
        token: u64,
        response: SearchResponse,
    },
    /// A newer submission was issued while this one was in flight.
    Stale { token: u64 },
    Failed { token: u64, error: SolveError },
}

impl SubmitOutcome {
    pub fn token(&self) -> u64 {
        match self {
            SubmitOutcome::Rendered { token, .. }
            | SubmitOutcome::Stale { token }
            | SubmitOutcome::Failed { token, .. } => *token,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, SubmitOutcome::Rendered { .. })
    }
}

pub type FailureCallback = Arc<dyn Fn(&SolveError) + Send + Sync>;

/// Turns form submissions into `/solve` calls and renders the answers.
///
/// Regions are only touched on success, and only by the most recently
/// issued submission. Superseded submissions come back as `Stale` whether
/// they succeeded or failed.
pub struct SubmitHandler<F, R, G> {
    client: SolveClient,
    form: F,
    results: Mutex<R>,
    diagram: Mutex<G>,
    latest_token: AtomicU64,
    phase: AtomicU8,
    failure_callback: Option<FailureCallback>,
}

impl<F, R, G> SubmitHandler<F, R, G>
where
    F: FormInputs,
    R: ResultsRegion,
    G: DiagramRegion,
{
    pub fn new(client: SolveClient, form: F, results: R, diagram: G) -> Self {
        Self {
            client,
            form,
            results: Mutex::new(results),
            diagram: Mutex::new(diagram),
            latest_token: AtomicU64::new(0),
            phase: AtomicU8::new(Phase::Idle as u8),
            failure_callback: None,
        }
    }

    pub fn with_failure_callback(mut self, callback: FailureCallback) -> Self {
        self.failure_callback = Some(callback);
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub async fn results(&self) -> MutexGuard<'_, R> {
        self.results.lock().await
    }

    pub async fn diagram(&self) -> MutexGuard<'_, G> {
        self.diagram.lock().await
    }

    /// Non-blocking access for render loops.
    pub fn try_regions(&self) -> Option<(MutexGuard<'_, R>, MutexGuard<'_, G>)> {
        let results = self.results.try_lock().ok()?;
        let diagram = self.diagram.try_lock().ok()?;
        Some((results, diagram))
    }

    pub async fn handle_submit(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(Phase::Submitting);
        debug!("Submission {} started", token);

        match self.fetch().await {
            Ok(response) => {
                let mut results = self.results.lock().await;
                let mut diagram = self.diagram.lock().await;

                if !self.is_latest(token) {
                    debug!(
                        "Discarding response for submission {} (latest is {})",
                        token,
                        self.latest_token.load(Ordering::SeqCst)
                    );
                    return SubmitOutcome::Stale { token };
                }

                results.show_summary(&Summary::from(&response));
                draw_solution(&mut *diagram, &response.solution);
                self.set_phase(Phase::Rendered);
                info!(
                    "Rendered {} nodes for submission {}",
                    response.solution.len(),
                    token
                );

                SubmitOutcome::Rendered { token, response }
            }
            Err(error) => {
                if !self.is_latest(token) {
                    debug!("Discarding failure for submission {}: {}", token, error);
                    return SubmitOutcome::Stale { token };
                }

                error!("Submission {} failed: {}", token, error);
                if let Some(ref callback) = self.failure_callback {
                    callback(&error);
                }
                self.set_phase(Phase::Failed);
                SubmitOutcome::Failed { token, error }
            }
        }
    }

    async fn fetch(&self) -> Result<SearchResponse, SolveError> {
        let request = SearchRequest::new(
            &self.form.start(),
            &self.form.end(),
            &self.form.algorithm(),
        )?;
        self.client.solve(&request).await
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }
}
