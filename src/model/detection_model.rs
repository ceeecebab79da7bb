use crate::{Error, Result};

use super::{
    data::{FaceData, KeyPoints},
    TensorData,
};

/// SCRFD face detector (det_10g.onnx): three output heads per stride with
/// two anchors per feature-map cell, distances expressed in stride units.
//https://github.com/deepinsight/insightface/blob/master/python-package/insightface/model_zoo/scrfd.py
//https://github.com/xclud/rust_insightface/blob/main/src/lib.rs
pub struct DetectionModel(pub ort::Session);

const STRIDES: [usize; 3] = [8, 16, 32];
const ANCHORS_PER_CELL: usize = 2;

impl DetectionModel {
    pub const INPUT_SIZE: (usize, usize) = (640, 640);

    // det_10g.onnx
    #[tracing::instrument(name = "Initialize detection model", err)]
    pub fn new(onnx_path: std::path::PathBuf) -> Result<Self> {
        Ok(Self(super::start_session_from_file(onnx_path)?))
    }

    // [n, 3, 640, 640]
    pub fn run(
        &self,
        data: TensorData,
        score_threshold: f32,
        nms_threshold: f32,
    ) -> Result<Vec<FaceData>> {
        let input = data.mapv(|v| (v * 255. - 127.5) / 128.);
        let outputs = self
            .0
            .run(ort::inputs![input].map_err(Error::ModelError)?)
            .map_err(Error::ModelError)?;

        let mut faces = Vec::new();
        for (head, &stride) in STRIDES.iter().enumerate() {
            let scores = outputs[head]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;
            let bboxes = outputs[head + STRIDES.len()]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;
            let keypoints = outputs[head + 2 * STRIDES.len()]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;

            let cells = Self::INPUT_SIZE.0 / stride;
            let anchors = cells * cells * ANCHORS_PER_CELL;
            for n in 0..anchors {
                let score = scores[[n, 0]];
                if score < score_threshold {
                    continue;
                }
                let cell = n / ANCHORS_PER_CELL;
                let (cx, cy) = (
                    ((cell % cells) * stride) as f32,
                    ((cell / cells) * stride) as f32,
                );
                let stride = stride as f32;
                let bbox = (
                    cx - bboxes[[n, 0]] * stride,
                    cy - bboxes[[n, 1]] * stride,
                    cx + bboxes[[n, 2]] * stride,
                    cy + bboxes[[n, 3]] * stride,
                );
                let kps = std::array::from_fn(|j| {
                    [
                        cx + keypoints[[n, 2 * j]] * stride,
                        cy + keypoints[[n, 2 * j + 1]] * stride,
                    ]
                });
                faces.push(FaceData {
                    score,
                    keypoints: KeyPoints(kps),
                    bbox,
                });
            }
        }

        Ok(non_max_suppression(faces, nms_threshold))
    }
}

fn non_max_suppression(mut faces: Vec<FaceData>, nms_threshold: f32) -> Vec<FaceData> {
    faces.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<FaceData> = Vec::with_capacity(faces.len());
    for face in faces {
        if kept.iter().all(|k| k.iou(&face) <= nms_threshold) {
            kept.push(face);
        }
    }
    kept
}

#[cfg(test)]
mod test {
    use super::{non_max_suppression, FaceData, KeyPoints};

    fn face(score: f32, bbox: (f32, f32, f32, f32)) -> FaceData {
        FaceData {
            score,
            keypoints: KeyPoints([[0., 0.]; 5]),
            bbox,
        }
    }

    #[test]
    fn suppresses_overlapping_detections() {
        let faces = vec![
            face(0.9, (0., 0., 100., 100.)),
            face(0.8, (5., 5., 105., 105.)),
            face(0.7, (300., 300., 400., 400.)),
        ];
        let kept = non_max_suppression(faces, 0.4);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].score, 0.9);
        assert_eq!(kept[1].score, 0.7);
    }

    #[test]
    fn keeps_highest_score_first() {
        let faces = vec![
            face(0.6, (0., 0., 10., 10.)),
            face(0.95, (0., 0., 10., 10.)),
        ];
        let kept = non_max_suppression(faces, 0.4);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score, 0.95);
    }
}
