//! Single-flight generation lifecycle for one authoring form.
//!
//! A controller moves `Idle -> Pending -> {Resolved, Failed} -> Idle`. While a
//! request is pending, further submissions are refused so the provider is never
//! called twice for one form. Create and Story each own an independent controller.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::generator::ImageGenerator;
use crate::story::StoryScene;
use crate::types::{AspectRatio, GenerationRequest, ImageKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("prompt is empty")]
    EmptyInput,
    #[error("a generation is already pending for this form")]
    ConcurrentSubmission,
    #[error("image generation failed: {0}")]
    RemoteGenerationFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Resolved,
    Failed,
}

/// Handed to the [`CompletionHandler`] once per successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCompleted {
    pub image_url: String,
    /// Text to record with the image; for story scenes this is the `[title] scene` form.
    pub prompt: String,
    pub kind: ImageKind,
    pub aspect_ratio: AspectRatio,
}

/// Receives successful generations. Never called on failure.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn on_generated(&self, event: GenerationCompleted);
}

#[derive(Debug, Default)]
struct ControllerState {
    pending: bool,
    last_outcome: Option<GenerationOutcome>,
}

pub struct GenerationController {
    kind: ImageKind,
    generator: Arc<dyn ImageGenerator>,
    state: Mutex<ControllerState>,
}

impl GenerationController {
    pub fn new(kind: ImageKind, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            kind,
            generator,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn state(&self) -> GenerationState {
        if self.lock_state().pending {
            GenerationState::Pending
        } else {
            GenerationState::Idle
        }
    }

    /// Outcome of the most recent settled submission.
    pub fn last_outcome(&self) -> Option<GenerationOutcome> {
        self.lock_state().last_outcome
    }

    /// Runs one generation for `request` and returns the image reference.
    ///
    /// Blank prompts return [`GenerationError::EmptyInput`] without contacting the
    /// generator; a submission while another is pending returns
    /// [`GenerationError::ConcurrentSubmission`].
    pub async fn submit(
        &self,
        request: GenerationRequest,
        handler: &dyn CompletionHandler,
    ) -> Result<String, GenerationError> {
        if request.is_blank() {
            debug!(kind = %self.kind, "ignoring blank prompt");
            return Err(GenerationError::EmptyInput);
        }
        let record_prompt = request.prompt.clone();
        self.run(request, record_prompt, handler).await
    }

    /// Story-mode submission: composes the consistency prompt from the scene
    /// context and records the scene under its `[title] scene` text.
    pub async fn submit_scene(
        &self,
        scene: &StoryScene,
        handler: &dyn CompletionHandler,
    ) -> Result<String, GenerationError> {
        if scene.is_blank() {
            debug!(kind = %self.kind, "ignoring blank scene");
            return Err(GenerationError::EmptyInput);
        }
        self.run(scene.to_request(), scene.gallery_prompt(), handler).await
    }

    async fn run(
        &self,
        request: GenerationRequest,
        record_prompt: String,
        handler: &dyn CompletionHandler,
    ) -> Result<String, GenerationError> {
        let mut guard = self.begin()?;

        let result = self.generator.generate(&request).await;
        match result {
            Ok(image_url) => {
                guard.settle(GenerationOutcome::Resolved);
                drop(guard);
                handler
                    .on_generated(GenerationCompleted {
                        image_url: image_url.clone(),
                        prompt: record_prompt,
                        kind: self.kind,
                        aspect_ratio: request.aspect_ratio,
                    })
                    .await;
                Ok(image_url)
            }
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "image generation failed");
                guard.settle(GenerationOutcome::Failed);
                Err(GenerationError::RemoteGenerationFailure(err.to_string()))
            }
        }
    }

    fn begin(&self) -> Result<PendingGuard<'_>, GenerationError> {
        let mut state = self.lock_state();
        if state.pending {
            debug!(kind = %self.kind, "refusing concurrent submission");
            return Err(GenerationError::ConcurrentSubmission);
        }
        state.pending = true;
        Ok(PendingGuard {
            state: &self.state,
            outcome: None,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears `pending` when dropped, so a dropped in-flight future cannot leave the
/// form locked.
struct PendingGuard<'a> {
    state: &'a Mutex<ControllerState>,
    outcome: Option<GenerationOutcome>,
}

impl PendingGuard<'_> {
    fn settle(&mut self, outcome: GenerationOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.pending = false;
        if let Some(outcome) = self.outcome {
            state.last_outcome = Some(outcome);
        }
    }
}
