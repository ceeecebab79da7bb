use std::{
    fs,
    io::Write,
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime},
};

use crate::{setting::UploadConfig, Error, Result};

/// Receives evidentiary captures. Fire-and-forget from the monitor's side:
/// a failed upload is logged by the caller and never retried.
pub trait CaptureSink: Send + Sync {
    fn upload(&self, image: &[u8], content_type: &str, taken_at: SystemTime) -> Result<()>;
}

pub fn from_config(config: &UploadConfig) -> Arc<dyn CaptureSink> {
    match &config.endpoint {
        Some(endpoint) => Arc::new(HttpSink::new(endpoint.clone())),
        None => Arc::new(DiskSink::new(PathBuf::from(&config.capture_dir))),
    }
}

fn epoch_millis(taken_at: SystemTime) -> u128 {
    taken_at
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// POSTs capture bytes to the exam backend.
pub struct HttpSink {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSink {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(10))
                .build(),
        }
    }
}

impl CaptureSink for HttpSink {
    fn upload(&self, image: &[u8], content_type: &str, taken_at: SystemTime) -> Result<()> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", content_type)
            .set("X-Captured-At", &epoch_millis(taken_at).to_string())
            .send_bytes(image)
            .map_err(Error::as_upload_error)?;
        tracing::info!(
            endpoint = %self.endpoint,
            status = response.status(),
            bytes = image.len(),
            "capture uploaded"
        );
        Ok(())
    }
}

/// Writes captures to a local directory, for offline runs and development.
pub struct DiskSink {
    dir: PathBuf,
}

impl DiskSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn extension(content_type: &str) -> &'static str {
        match content_type {
            "image/png" => "png",
            _ => "jpeg",
        }
    }
}

impl CaptureSink for DiskSink {
    fn upload(&self, image: &[u8], content_type: &str, taken_at: SystemTime) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|err| Error::UnknownError(Box::new(err)))?;
        let path = self.dir.join(format!(
            "capture_{}.{}",
            epoch_millis(taken_at),
            Self::extension(content_type)
        ));
        fs::File::create(&path)
            .map_err(|err| Error::UnknownError(Box::new(err)))?
            .write_all(image)
            .map_err(|err| Error::UnknownError(Box::new(err)))?;
        tracing::info!(path = %path.display(), bytes = image.len(), "capture stored");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::SystemTime;

    use super::{CaptureSink, DiskSink};

    #[test]
    fn disk_sink_writes_timestamped_jpeg() {
        let dir = std::env::temp_dir().join(format!("invigil_sink_{}", rand::random::<u32>()));
        let sink = DiskSink::new(dir.clone());

        sink.upload(&[0xFF, 0xD8, 0xFF], "image/jpeg", SystemTime::now())
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].file_name().into_string().unwrap();
        assert!(name.starts_with("capture_"));
        assert!(name.ends_with(".jpeg"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
