use crate::error::GenerationError;
use crate::generation::{ExistingFile, GenerationService, GenerationServiceFactory};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Arguments of one `generate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub description: String,
    pub context: String,
    pub use_high_quality_model: bool,
    pub existing_files: Vec<ExistingFile>,
}

/// Generation service whose responses are scripted per description.
///
/// Descriptions without a script succeed with `// generated: <description>`.
#[derive(Default)]
pub struct ScriptedGenerationService {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, GenerationError>>>>,
    delays: Mutex<HashMap<String, Duration>>,
    panics: Mutex<Vec<String>>,
    pub calls: Arc<Mutex<Vec<GenerateCall>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_content(description: &str) -> String {
        format!("// generated: {description}")
    }

    /// Queue responses returned, in order, for `description`
    pub fn respond(self, description: &str, responses: Vec<Result<String, GenerationError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(description.to_string())
            .or_default()
            .extend(responses);
        self
    }

    /// Fail the first `times` calls for `description`
    pub fn fail_times(self, description: &str, times: usize) -> Self {
        let failures = (0..times)
            .map(|i| Err(GenerationError::RequestFailed(format!("scripted failure {}", i + 1))))
            .collect();
        self.respond(description, failures)
    }

    pub fn with_delay(self, description: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(description.to_string(), delay);
        self
    }

    pub fn panic_on(self, description: &str) -> Self {
        self.panics.lock().unwrap().push(description.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, description: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.description == description)
            .count()
    }

    /// Highest number of concurrent `generate` calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerationService {
    async fn generate(
        &self,
        description: &str,
        context: &str,
        use_high_quality_model: bool,
        existing_files: &[ExistingFile],
    ) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(GenerateCall {
            description: description.to_string(),
            context: context.to_string(),
            use_high_quality_model,
            existing_files: existing_files.to_vec(),
        });

        if self.panics.lock().unwrap().iter().any(|d| d == description) {
            panic!("scripted panic for {description}");
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(description).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(description)
            .and_then(|queue| queue.pop_front());
        scripted.unwrap_or_else(|| Ok(Self::default_content(description)))
    }
}

/// Factory handing out one shared service, counting how often it is asked to.
pub struct StaticGenerationFactory {
    service: Arc<dyn GenerationService>,
    pub credentials: Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl StaticGenerationFactory {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            credentials: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            service: Arc::new(ScriptedGenerationService::new()),
            credentials: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn create_count(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }
}

impl GenerationServiceFactory for StaticGenerationFactory {
    fn create(&self, credential: &str) -> Result<Arc<dyn GenerationService>, GenerationError> {
        self.credentials.lock().unwrap().push(credential.to_string());
        match &self.fail_with {
            Some(message) => Err(GenerationError::Other(message.clone())),
            None => Ok(Arc::clone(&self.service)),
        }
    }
}
