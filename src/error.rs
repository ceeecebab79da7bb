use std::error::Error as StdError;

#[derive(Debug)]
pub enum Error {
    CVError(opencv::Error),
    GuiError(eframe::Error),
    ConfigError(config::ConfigError),
    ModelError(ort::Error),
    ImageError(image::ImageError),
    UploadError(Box<ureq::Error>),
    SyncError(Box<dyn StdError + Send + Sync>),
    UnknownError(Box<dyn StdError>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CVError(err) => write!(f, "opencv error: {}", err),
            Error::GuiError(err) => write!(f, "gui error: {}", err),
            Error::ConfigError(err) => write!(f, "configuration error: {}", err),
            Error::ModelError(err) => write!(f, "model error: {}", err),
            Error::ImageError(err) => write!(f, "image error: {}", err),
            Error::UploadError(err) => write!(f, "upload error: {}", err),
            Error::SyncError(err) => write!(f, "sync error: {}", err),
            Error::UnknownError(err) => write!(f, "unknown error: {}", err),
        }
    }
}

impl StdError for Error {}

impl Error {
    pub fn as_unknown_error<E: StdError + 'static>(err: E) -> Self {
        Self::UnknownError(Box::new(err))
    }

    pub fn as_sync_error<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::SyncError(Box::new(err))
    }

    pub fn as_guard_error<T>(_: std::sync::PoisonError<T>) -> Self {
        Self::SyncError("lock poisoned by a panicked holder".into())
    }

    pub fn as_upload_error(err: ureq::Error) -> Self {
        Self::UploadError(Box::new(err))
    }
}
