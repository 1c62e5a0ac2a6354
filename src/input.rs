use serde::{Deserialize, Serialize};

/// One prediction request as entered by the user. Field names match the
/// columns the model was trained on. Ranges are validated upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawVideoInput {
    pub duration_seconds: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub num_frames: u64,
    #[serde(rename = "file_size_MB")]
    pub file_size_mb: f64,
    pub audio_fps: f64,
    pub audio_channels: u32,
    /// Expected as `MM/DD/YYYY`.
    pub publish_time: String,
    pub codec: String,
    pub has_audio: u8,
    pub title: String,
}

#[cfg(test)]
impl RawVideoInput {
    pub(crate) fn sample(codec: &str, title: &str) -> Self {
        Self {
            duration_seconds: 150.0,
            fps: 25.0,
            width: 1280,
            height: 720,
            num_frames: 3750,
            file_size_mb: 10.0,
            audio_fps: 48000.0,
            audio_channels: 2,
            publish_time: "10/19/2023".to_string(),
            codec: codec.to_string(),
            has_audio: 1,
            title: title.to_string(),
        }
    }
}
