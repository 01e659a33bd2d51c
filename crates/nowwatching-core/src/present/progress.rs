//! Progress bar math and `M:SS` clock strings.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressData {
    /// Always within `0.0..=100.0`.
    pub percentage: f64,
    pub current_time: String,
    /// `-M:SS` of what is left, or `0:00` when nothing is left.
    pub remaining_time: String,
}

impl ProgressData {
    pub fn zero() -> Self {
        Self {
            percentage: 0.0,
            current_time: "0:00".into(),
            remaining_time: "0:00".into(),
        }
    }
}

/// Render milliseconds as `M:SS`. Negative or unknown input renders `0:00`.
pub fn format_time_ms(ms: Option<i64>) -> String {
    let Some(ms) = ms.filter(|ms| *ms >= 0) else {
        return "0:00".into();
    };
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Progress of `progress_ms` through `duration_ms`.
///
/// An unknown or non-positive duration, or an unknown position, yields
/// [`ProgressData::zero`]. The position is clamped to `0..=duration`.
pub fn progress(progress_ms: Option<i64>, duration_ms: Option<i64>) -> ProgressData {
    let (Some(position), Some(duration)) = (progress_ms, duration_ms.filter(|d| *d > 0)) else {
        return ProgressData::zero();
    };
    let position = position.clamp(0, duration);
    let remaining = duration - position;

    ProgressData {
        percentage: position as f64 / duration as f64 * 100.0,
        current_time: format_time_ms(Some(position)),
        remaining_time: if remaining > 0 {
            format!("-{}", format_time_ms(Some(remaining)))
        } else {
            "0:00".into()
        },
    }
}
