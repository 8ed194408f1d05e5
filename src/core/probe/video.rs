//! ffprobe prober for video containers.
//!
//! One external `ffprobe` invocation per file, JSON output, caller-imposed
//! timeout. The child is polled and killed at the deadline so a wedged probe
//! can never stall the scan; the reader thread drains stdout so the child
//! can't block on a full pipe.

use super::{MediaMetadata, MetadataProber, ProbeOutcome, TagValue};
use crate::error::ProbeError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const TOOL: &str = "ffprobe";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Probes container-level metadata via ffprobe
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl MetadataProber for FfprobeProber {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        let mut child = match Command::new(TOOL)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                return ProbeOutcome::Failed(ProbeError::Launch {
                    tool: TOOL,
                    message: e.to_string(),
                })
            }
        };

        let Some(mut stdout) = child.stdout.take() else {
            return ProbeOutcome::Failed(ProbeError::Launch {
                tool: TOOL,
                message: "stdout not captured".to_string(),
            });
        };
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return ProbeOutcome::Failed(ProbeError::Timeout {
                            tool: TOOL,
                            seconds: self.timeout.as_secs(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return ProbeOutcome::Failed(ProbeError::Launch {
                        tool: TOOL,
                        message: e.to_string(),
                    })
                }
            }
        };

        let output = reader.join().unwrap_or_default();

        if !status.success() {
            return ProbeOutcome::Failed(ProbeError::Exit {
                tool: TOOL,
                status: status.to_string(),
            });
        }

        parse_ffprobe_json(&output)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    tags: BTreeMap<String, String>,
    duration: Option<String>,
    size: Option<String>,
}

/// Turn ffprobe's JSON into a metadata dictionary.
///
/// Tag keys are lowercased (containers disagree on casing); all values are
/// simple strings at the format level.
fn parse_ffprobe_json(bytes: &[u8]) -> ProbeOutcome {
    let parsed: FfprobeOutput = match serde_json::from_slice(bytes) {
        Ok(p) => p,
        Err(e) => {
            return ProbeOutcome::Failed(ProbeError::Malformed {
                tool: TOOL,
                message: e.to_string(),
            })
        }
    };

    let Some(format) = parsed.format else {
        return ProbeOutcome::Absent;
    };

    let mut metadata = MediaMetadata {
        duration_secs: format.duration.as_deref().and_then(|d| d.parse().ok()),
        size_bytes: format.size.as_deref().and_then(|s| s.parse().ok()),
        ..Default::default()
    };
    for (key, value) in format.tags {
        metadata
            .tags
            .insert(key.to_lowercase(), TagValue::Simple(value));
    }

    if metadata.tags.is_empty() && metadata.duration_secs.is_none() && metadata.size_bytes.is_none()
    {
        ProbeOutcome::Absent
    } else {
        ProbeOutcome::Found(metadata)
    }
}
