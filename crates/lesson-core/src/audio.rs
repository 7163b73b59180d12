//! Audio completion contract used by the lesson timeline.
//!
//! The timeline never touches an audio device. It asks a bridge to play a
//! clip and receives a future that resolves exactly once when playback ends,
//! fails, or (through [`with_timeout`]) never reports back in time.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Opaque clip identifier resolved by the bridge implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipId(String);

impl ClipId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        ClipId(value.to_string())
    }
}

impl From<String> for ClipId {
    fn from(value: String) -> Self {
        ClipId(value)
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Finished,
    Failed(String),
    TimedOut,
}

impl AudioOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AudioOutcome::Finished)
    }
}

pub type Completion = Pin<Box<dyn Future<Output = AudioOutcome> + Send + 'static>>;

pub trait AudioBridge: Send + Sync {
    /// Start playing `clip`. The returned future resolves once, when the clip
    /// stops for any reason. A clip that cannot be loaded resolves to
    /// [`AudioOutcome::Failed`].
    fn play(&self, clip: &ClipId) -> Completion;

    /// Stop whatever is playing. Pending completions still resolve.
    fn stop(&self) {}
}

/// Resolve to [`AudioOutcome::TimedOut`] if `completion` takes longer than
/// `limit`.
pub fn with_timeout(completion: Completion, limit: Duration) -> Completion {
    Box::pin(async move {
        match tokio::time::timeout(limit, completion).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(limit_ms = limit.as_millis() as u64, "Audio completion timed out");
                AudioOutcome::TimedOut
            }
        }
    })
}

/// Bridge that plays nothing and reports completion after a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct SilentBridge {
    clip_duration: Duration,
}

impl SilentBridge {
    pub fn new(clip_duration: Duration) -> Self {
        Self { clip_duration }
    }
}

impl AudioBridge for SilentBridge {
    fn play(&self, clip: &ClipId) -> Completion {
        let duration = self.clip_duration;
        debug!(clip = %clip, duration_ms = duration.as_millis() as u64, "Silent playback");
        Box::pin(async move {
            tokio::time::sleep(duration).await;
            AudioOutcome::Finished
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn silent_bridge_finishes_after_its_duration() {
        let bridge = SilentBridge::new(Duration::from_secs(3));
        let started = tokio::time::Instant::now();
        let outcome = bridge.play(&ClipId::from("intro")).await;
        assert_eq!(outcome, AudioOutcome::Finished);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn never_arriving_completion_times_out() {
        let never: Completion = Box::pin(std::future::pending());
        let outcome = with_timeout(never, Duration::from_secs(30)).await;
        assert_eq!(outcome, AudioOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_passes_through_prompt_outcomes() {
        let failed: Completion =
            Box::pin(async { AudioOutcome::Failed("missing clip".to_string()) });
        let outcome = with_timeout(failed, Duration::from_secs(30)).await;
        assert_eq!(outcome, AudioOutcome::Failed("missing clip".to_string()));
    }
}
