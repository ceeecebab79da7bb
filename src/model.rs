use detection_model::DetectionModel;

use crate::{cv::Matrix, setting::ModelConfig, Error, Result};

pub use data::{FaceData, KeyPoints};

mod detection_model;

pub mod data;

pub type TensorData = ndarray::Array<f32, ndarray::Dim<[usize; 4]>>;

/// Face detector over the live feed. Landmark coordinates come back in the
/// pixel space of the sampled frame.
pub struct Model {
    detect: DetectionModel,
    config: ModelConfig,
}

impl Model {
    #[tracing::instrument(name = "Initializing detection model", skip(config), err)]
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let model_base_path = std::env::current_dir()
            .map_err(Error::as_unknown_error)?
            .join("models");

        Ok(Self {
            detect: DetectionModel::new(model_base_path.join("det_10g.onnx"))?,
            config: *config,
        })
    }

    pub fn detect(&self, frame: &Matrix) -> Result<Vec<FaceData>> {
        let (frame_w, frame_h) = frame.dimensions();
        let input = frame.resize(DetectionModel::INPUT_SIZE);
        let mut faces = self.detect.run(
            TensorData::from(&input),
            self.config.score_threshold,
            self.config.nms_threshold,
        )?;

        // back to frame pixel space
        let (scale_x, scale_y) = (
            frame_w as f32 / DetectionModel::INPUT_SIZE.0 as f32,
            frame_h as f32 / DetectionModel::INPUT_SIZE.1 as f32,
        );
        for face in faces.iter_mut() {
            face.scale(scale_x, scale_y);
        }
        Ok(faces)
    }
}

#[tracing::instrument(err)]
pub fn register_ort(config: &ModelConfig) -> Result<()> {
    let onnx_env = ort::init().with_name("invigil_face_detector");

    let onnx_env = match config.cuda {
        true => onnx_env.with_execution_providers([ort::CUDAExecutionProvider::default()
            .build()
            .error_on_failure()]),
        false => onnx_env,
    };

    onnx_env.commit().map_err(Error::ModelError)?;
    Ok(())
}

pub(crate) fn start_session_from_file(onnx_path: std::path::PathBuf) -> Result<ort::Session> {
    ort::Session::builder()
        .map_err(Error::ModelError)?
        .with_intra_threads(4)
        .map_err(Error::ModelError)?
        .commit_from_file(onnx_path)
        .map_err(Error::ModelError)
}
