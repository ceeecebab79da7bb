pub use face::FaceData;
pub use keypoints::KeyPoints;

pub mod face;
pub mod keypoints;
