pub const KEY_POINTS_LEN: usize = 5;

/// Five-point face landmarks, in detection order:
/// left eye, right eye, nose tip, left mouth corner, right mouth corner.
#[derive(Debug, Clone, Copy)]
pub struct KeyPoints(pub [[f32; 2]; KEY_POINTS_LEN]);

impl KeyPoints {
    pub fn left_eye(&self) -> [f32; 2] {
        self.0[0]
    }

    pub fn right_eye(&self) -> [f32; 2] {
        self.0[1]
    }

    pub fn nose(&self) -> [f32; 2] {
        self.0[2]
    }

    pub fn scale(&mut self, scale_x: f32, scale_y: f32) {
        for [x, y] in self.0.iter_mut() {
            *x *= scale_x;
            *y *= scale_y;
        }
    }
}
