use opencv::{core, prelude::*, videoio};

use crate::setting::CameraConfig;

pub use matrix::Matrix;

pub mod matrix;

/// Live camera feed. An unopened device or an empty frame is reported as an
/// error so callers can tell "feed unavailable" apart from "no faces".
pub struct CV(videoio::VideoCapture);

impl CV {
    //https://docs.opencv.org/3.4/d4/d15/group__videoio__flags__base.html
    pub fn new(config: &CameraConfig) -> crate::Result<Self> {
        let cam = videoio::VideoCapture::new(config.index, videoio::CAP_ANY)
            .map_err(crate::Error::CVError)?;

        if !cam.is_opened().map_err(crate::Error::CVError)? {
            return Err(crate::Error::UnknownError(
                "Unable to open capture device".into(),
            ));
        }

        Ok(Self(cam))
    }

    pub fn is_ready(&self) -> bool {
        self.0.is_opened().unwrap_or(false)
    }

    pub fn get_frame(&mut self) -> crate::Result<Matrix> {
        let mut frame = core::Mat::default();
        let grabbed = self.read(&mut frame).map_err(crate::Error::CVError)?;
        let size = frame.size().map_err(crate::Error::CVError)?;
        if !grabbed || size.width == 0 || size.height == 0 {
            return Err(crate::Error::UnknownError(
                "capture device returned an empty frame".into(),
            ));
        }
        Ok(Matrix::from(frame))
    }
}

impl std::ops::Deref for CV {
    type Target = videoio::VideoCapture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for CV {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
