use super::KeyPoints;

pub type BBox = (f32, f32, f32, f32);

#[derive(Debug, Clone)]
pub struct FaceData {
    pub score: f32,
    pub keypoints: KeyPoints,
    pub bbox: BBox,
}

impl FaceData {
    // Intersection Over Union
    pub fn iou(&self, face: &FaceData) -> f32 {
        let (xx1, yy1, xx2, yy2) = (
            self.bbox.0.max(face.bbox.0),
            self.bbox.1.max(face.bbox.1),
            self.bbox.2.min(face.bbox.2),
            self.bbox.3.min(face.bbox.3),
        );
        let inter = 0f32.max(xx2 - xx1 + 1.) * 0f32.max(yy2 - yy1 + 1.);
        inter / (self.area() + face.area() - inter)
    }

    pub fn scale(&mut self, scale_x: f32, scale_y: f32) {
        self.bbox = (
            self.bbox.0 * scale_x,
            self.bbox.1 * scale_y,
            self.bbox.2 * scale_x,
            self.bbox.3 * scale_y,
        );
        self.keypoints.scale(scale_x, scale_y);
    }

    fn area(&self) -> f32 {
        (self.bbox.2 - self.bbox.0 + 1.) * (self.bbox.3 - self.bbox.1 + 1.)
    }
}

#[cfg(test)]
mod test {
    use super::{FaceData, KeyPoints};

    fn face(bbox: (f32, f32, f32, f32)) -> FaceData {
        FaceData {
            score: 1.,
            keypoints: KeyPoints([[0., 0.]; 5]),
            bbox,
        }
    }

    #[test]
    fn identical_boxes_have_full_overlap() {
        let a = face((0., 0., 99., 99.));
        assert!((a.iou(&a) - 1.).abs() < 1e-6);
    }

    #[test]
    fn disjoint_boxes_have_no_overlap() {
        let a = face((0., 0., 10., 10.));
        let b = face((100., 100., 120., 120.));
        assert_eq!(a.iou(&b), 0.);
    }
}
