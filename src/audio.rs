//! Narration playback through `rodio`.
//!
//! Clip ids resolve to files in the configured clips directory. Each clip
//! plays on a blocking task that owns its output stream and reports back once
//! the sink drains, so the lesson timeline receives exactly one completion per
//! request. Missing or undecodable clips report a failure instead of staying
//! silent.

use crate::config::AppConfig;
use anyhow::{Context, Result, anyhow};
use lesson_core::{AudioBridge, AudioOutcome, ClipId, Completion, SilentBridge};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const CLIP_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "flac"];

pub struct RodioBridge {
    clips_dir: PathBuf,
    volume: f32,
    current: Arc<Mutex<Option<Arc<Sink>>>>,
    stop_epoch: Arc<AtomicU64>,
}

/// Snapshot of the stop counter taken when playback is requested. Any later
/// `stop()` marks the playback as cancelled, even before its sink exists.
#[derive(Debug, Clone)]
struct PlaybackTicket {
    epoch: u64,
    stop_epoch: Arc<AtomicU64>,
}

impl PlaybackTicket {
    fn is_cancelled(&self) -> bool {
        self.stop_epoch.load(Ordering::SeqCst) != self.epoch
    }
}

impl RodioBridge {
    pub fn new(clips_dir: PathBuf, volume: f32) -> Self {
        info!(
            clips_dir = %clips_dir.display(),
            volume,
            "Initializing narration playback"
        );
        Self {
            clips_dir,
            volume: volume.clamp(0.0, 2.0),
            current: Arc::new(Mutex::new(None)),
            stop_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    fn ticket(&self) -> PlaybackTicket {
        PlaybackTicket {
            epoch: self.stop_epoch.load(Ordering::SeqCst),
            stop_epoch: Arc::clone(&self.stop_epoch),
        }
    }
}

impl AudioBridge for RodioBridge {
    fn play(&self, clip: &ClipId) -> Completion {
        let Some(path) = resolve_clip(&self.clips_dir, clip) else {
            let reason = format!(
                "no clip named '{clip}' in {}",
                self.clips_dir.display()
            );
            warn!(%clip, "{reason}");
            return Box::pin(async move { AudioOutcome::Failed(reason) });
        };

        let ticket = self.ticket();
        let volume = self.volume;
        let current = Arc::clone(&self.current);
        let clip = clip.clone();
        Box::pin(async move {
            let task =
                tokio::task::spawn_blocking(move || play_to_end(&path, volume, &current, &ticket));
            match task.await {
                Ok(Ok(())) => {
                    debug!(%clip, "Clip playback drained");
                    AudioOutcome::Finished
                }
                Ok(Err(err)) => {
                    warn!(%clip, "Clip playback failed: {err:#}");
                    AudioOutcome::Failed(format!("{err:#}"))
                }
                Err(err) => AudioOutcome::Failed(format!("playback task aborted: {err}")),
            }
        })
    }

    fn stop(&self) {
        self.stop_epoch.fetch_add(1, Ordering::SeqCst);
        let sink = match self.current.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return,
        };
        if let Some(sink) = sink {
            debug!("Stopping narration playback");
            sink.stop();
        }
    }
}

fn play_to_end(
    path: &Path,
    volume: f32,
    current: &Mutex<Option<Arc<Sink>>>,
    ticket: &PlaybackTicket,
) -> Result<()> {
    if ticket.is_cancelled() {
        debug!(path = %path.display(), "Playback stopped before it started");
        return Ok(());
    }
    let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
    let sink = Arc::new(Sink::try_new(&handle).context("Creating sink")?);
    let file = File::open(path).with_context(|| format!("Opening clip {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Decoding clip {}", path.display()))?;
    sink.set_volume(volume);
    sink.append(source);

    if let Ok(mut guard) = current.lock() {
        if let Some(previous) = guard.replace(Arc::clone(&sink)) {
            previous.stop();
        }
    }

    // A stop that landed while the clip was opening missed this sink.
    if ticket.is_cancelled() {
        debug!(path = %path.display(), "Playback stopped while opening");
        sink.stop();
    } else {
        debug!(path = %path.display(), "Playing clip");
        sink.sleep_until_end();
    }

    if let Ok(mut guard) = current.lock() {
        if guard.as_ref().is_some_and(|active| Arc::ptr_eq(active, &sink)) {
            guard.take();
        }
    }
    Ok(())
}

/// First existing `<clips_dir>/<clip>.<ext>` for the supported extensions.
pub fn resolve_clip(clips_dir: &Path, clip: &ClipId) -> Option<PathBuf> {
    let name = clip.as_str();
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return None;
    }
    CLIP_EXTENSIONS
        .iter()
        .map(|ext| clips_dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Pick the bridge for this machine: rodio when an output device opens,
/// otherwise a silent bridge that paces narration by a fixed clip length.
pub fn bridge_from_config(config: &AppConfig) -> Arc<dyn AudioBridge> {
    match probe_output() {
        Ok(()) => Arc::new(RodioBridge::new(
            PathBuf::from(&config.clips_dir),
            config.volume,
        )),
        Err(err) => {
            warn!("Audio output unavailable, narration will be silent: {err:#}");
            Arc::new(SilentBridge::new(config.silent_clip_duration()))
        }
    }
}

fn probe_output() -> Result<()> {
    OutputStream::try_default()
        .map(|_| ())
        .map_err(|err| anyhow!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_first_existing_extension() {
        let dir = std::env::temp_dir().join(format!(
            "sketchpad-lessons-clips-test-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("intro.wav"), b"RIFF").unwrap();

        assert_eq!(
            resolve_clip(&dir, &ClipId::from("intro")),
            Some(dir.join("intro.wav"))
        );
        assert_eq!(resolve_clip(&dir, &ClipId::from("outro")), None);
        assert_eq!(resolve_clip(&dir, &ClipId::from("../intro")), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_clip_fails_instead_of_staying_silent() {
        let bridge = RodioBridge::new(PathBuf::from("/nonexistent/clips"), 1.0);
        let outcome = bridge.play(&ClipId::from("lesson1_p1")).await;
        assert!(matches!(outcome, AudioOutcome::Failed(_)));
    }

    #[test]
    fn stop_cancels_playback_requested_earlier() {
        let bridge = RodioBridge::new(PathBuf::from("/nonexistent/clips"), 1.0);
        let before = bridge.ticket();
        assert!(!before.is_cancelled());

        bridge.stop();
        assert!(before.is_cancelled());
        assert!(!bridge.ticket().is_cancelled());
    }

    #[tokio::test]
    async fn clip_stopped_before_it_opens_never_plays() {
        let dir = std::env::temp_dir().join(format!(
            "sketchpad-lessons-stop-test-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        // Not decodable: reaching the decoder would report a failure.
        fs::write(dir.join("intro.wav"), b"not audio").unwrap();

        let bridge = RodioBridge::new(dir.clone(), 1.0);
        let completion = bridge.play(&ClipId::from("intro"));
        bridge.stop();

        assert_eq!(completion.await, AudioOutcome::Finished);
        assert!(bridge.current.lock().unwrap().is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
