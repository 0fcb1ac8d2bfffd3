/// 8-bit height-map image produced by one pipeline run
use crate::constants::SENTINEL;
use crate::error::OutputError;
use image::{GrayImage, ImageBuffer, Luma};
use std::fs;
use std::path::Path;

/// Row-major `rows x cols` grid of intensities. Rows follow the x axis of the
/// point cloud, columns the y axis. A cell equal to [`SENTINEL`] holds no sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightMapImage {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl HeightMapImage {
    /// Allocate an image with every cell empty
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![SENTINEL; rows * cols],
        }
    }

    /// Wrap an existing buffer. Returns `None` when the length does not match.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_sentinel(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == SENTINEL
    }

    /// Number of empty cells
    pub fn count_sentinel(&self) -> usize {
        self.data.iter().filter(|&&v| v == SENTINEL).count()
    }

    /// Convert to an `image` crate buffer (width = cols, height = rows)
    pub fn to_gray_image(&self) -> GrayImage {
        ImageBuffer::from_fn(self.cols as u32, self.rows as u32, |x, y| {
            Luma([self.get(y as usize, x as usize)])
        })
    }

    /// Write the image as an 8-bit greyscale PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> Result<(), OutputError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        self.to_gray_image()
            .save(path)
            .map_err(|source| OutputError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}
