/// Locally captured audio/video. A session cannot be built without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMedia {
    pub stream_id: String,
}

impl LocalMedia {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

/// Handle to a remote participant's stream, passed through to rendering untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMedia {
    pub stream_id: String,
}

impl From<&LocalMedia> for RemoteMedia {
    fn from(media: &LocalMedia) -> Self {
        Self {
            stream_id: media.stream_id.clone(),
        }
    }
}
