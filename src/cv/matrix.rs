use opencv::{core, prelude::*};

#[derive(Debug, Clone)]
pub struct Matrix(pub core::Mat);

impl Matrix {
    pub fn resize(&self, size: (usize, usize)) -> Self {
        let curr_size = self.size().unwrap_or(core::Size_::new(0, 0));
        if curr_size.width == size.0 as i32 && curr_size.height == size.1 as i32 {
            return Self(self.0.clone());
        }
        let new_size = core::Size_::new(size.0 as i32, size.1 as i32);
        let mut new_mat = core::Mat::default();
        match opencv::imgproc::resize(
            &self.0,
            &mut new_mat,
            new_size,
            0.,
            0.,
            if curr_size.width > new_size.width && curr_size.height > new_size.height {
                opencv::imgproc::INTER_AREA
            } else {
                opencv::imgproc::INTER_LINEAR
            },
        ) {
            Ok(_) => Self(new_mat),
            Err(_) => Self(
                core::Mat::new_rows_cols_with_default(
                    new_size.height,
                    new_size.width,
                    core::CV_8UC3,
                    core::Scalar::new(0., 0., 0., 1.),
                )
                .unwrap_or_default(),
            ),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let size = self.size().unwrap_or(core::Size_::new(0, 0));
        (size.width as usize, size.height as usize)
    }

    pub(crate) fn bgr_bytes(&self) -> Vec<u8> {
        let (w, h) = self.dimensions();
        self.data_bytes()
            .map(|bytes| bytes.to_vec())
            .unwrap_or_else(|_| vec![0; w * h * 3])
    }
}

impl From<core::Mat> for Matrix {
    fn from(value: core::Mat) -> Self {
        Self(value)
    }
}

impl From<&Matrix> for eframe::egui::ImageData {
    fn from(value: &Matrix) -> Self {
        use eframe::egui::{Color32, ColorImage, ImageData};
        use rayon::{iter::ParallelIterator, slice::ParallelSlice};
        let (w, h) = value.dimensions();
        ImageData::Color(std::sync::Arc::new(ColorImage {
            size: [w, h],
            pixels: value
                .bgr_bytes()
                .par_chunks_exact(3)
                // BGR -> RGB
                .map(|p| Color32::from_rgba_premultiplied(p[2], p[1], p[0], u8::MAX))
                .collect(),
        }))
    }
}

impl From<&Matrix> for crate::model::TensorData {
    fn from(value: &Matrix) -> Self {
        let (w, h) = value.dimensions();
        let bytes = value.bgr_bytes();
        // n, c, h, w | BGR -> RGB
        ndarray::Array::from_shape_fn((1, 3, h, w), |(_, c, y, x)| {
            (bytes[3 * x + 3 * y * w + (2 - c)] as f32) / 255.
        })
    }
}

impl std::ops::Deref for Matrix {
    type Target = core::Mat;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Matrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
