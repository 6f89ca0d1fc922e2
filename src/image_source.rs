//! In-memory images handed to the engine as bitmap files.

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use ndarray::{Array2, Array3};
use std::fmt;
use std::path::{Path, PathBuf};

/// Imaging library an adapter is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLibrary {
    /// `image` crate buffers.
    Image,
    /// `ndarray` pixel arrays, row-major, RGB channel order.
    Ndarray,
}

impl ImageLibrary {
    pub fn name(self) -> &'static str {
        match self {
            ImageLibrary::Image => "image",
            ImageLibrary::Ndarray => "ndarray",
        }
    }
}

impl fmt::Display for ImageLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can write itself, without alpha channel, as a BMP file.
pub trait BitmapSource {
    fn library(&self) -> ImageLibrary;

    fn save_bitmap(&self, path: &Path) -> Result<()>;
}

/// What the caller wants recognized.
#[derive(Clone, Copy)]
pub enum ImageInput<'a> {
    /// An image file, copied before use so the original is never touched.
    Path(&'a Path),
    Bitmap(&'a dyn BitmapSource),
}

impl<'a> ImageInput<'a> {
    pub fn bitmap(source: &'a dyn BitmapSource) -> Self {
        ImageInput::Bitmap(source)
    }
}

impl fmt::Debug for ImageInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageInput::Path(p) => f.debug_tuple("Path").field(p).finish(),
            ImageInput::Bitmap(b) => f.debug_tuple("Bitmap").field(&b.library()).finish(),
        }
    }
}

impl<'a> From<&'a Path> for ImageInput<'a> {
    fn from(path: &'a Path) -> Self {
        ImageInput::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageInput<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageInput::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for ImageInput<'a> {
    fn from(path: &'a str) -> Self {
        ImageInput::Path(Path::new(path))
    }
}

fn save_bmp(image: &DynamicImage, library: ImageLibrary, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Bmp)
        .map_err(|e| Error::ImageSave {
            library: library.name(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

impl BitmapSource for DynamicImage {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Image
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        // BMP takes 8-bit gray or RGB; everything else, alpha included, goes through RGB8.
        let flat = match self {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => self.clone(),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        save_bmp(&flat, self.library(), path)
    }
}

impl BitmapSource for RgbImage {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Image
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        save_bmp(&DynamicImage::ImageRgb8(self.clone()), self.library(), path)
    }
}

impl BitmapSource for RgbaImage {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Image
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        let rgb = DynamicImage::ImageRgba8(self.clone()).to_rgb8();
        save_bmp(&DynamicImage::ImageRgb8(rgb), self.library(), path)
    }
}

impl BitmapSource for GrayImage {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Image
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        save_bmp(&DynamicImage::ImageLuma8(self.clone()), self.library(), path)
    }
}

fn dimension(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::UnsupportedImage(format!("dimension {n} exceeds u32")))
}

/// `height × width × channels`, with 1, 3 or 4 channels; a fourth channel is dropped.
impl BitmapSource for Array3<u8> {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Ndarray
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        let (h, w, c) = self.dim();
        let (width, height) = (dimension(w)?, dimension(h)?);
        let image = match c {
            1 => DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
                image::Luma([self[[y as usize, x as usize, 0]]])
            })),
            3 | 4 => DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                let (x, y) = (x as usize, y as usize);
                Rgb([self[[y, x, 0]], self[[y, x, 1]], self[[y, x, 2]]])
            })),
            n => {
                return Err(Error::UnsupportedImage(format!(
                    "ndarray image with {n} channels"
                )));
            }
        };
        save_bmp(&image, self.library(), path)
    }
}

/// `height × width` grayscale.
impl BitmapSource for Array2<u8> {
    fn library(&self) -> ImageLibrary {
        ImageLibrary::Ndarray
    }

    fn save_bitmap(&self, path: &Path) -> Result<()> {
        let (h, w) = self.dim();
        let image = GrayImage::from_fn(dimension(w)?, dimension(h)?, |x, y| {
            image::Luma([self[[y as usize, x as usize]]])
        });
        save_bmp(&DynamicImage::ImageLuma8(image), self.library(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageReader, Rgba};

    fn reopen(path: &Path) -> DynamicImage {
        ImageReader::open(path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap()
    }

    #[test]
    fn rgba_is_flattened_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TESS_in");
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 0]));
        img.save_bitmap(&path).unwrap();

        let back = reopen(&path);
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 3);
        assert!(!back.color().has_alpha());
        assert_eq!(back.to_rgb8().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn ndarray_drops_fourth_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TESS_arr");
        let mut arr = Array3::<u8>::zeros((2, 5, 4));
        arr[[1, 4, 0]] = 200;
        arr[[1, 4, 3]] = 255;
        arr.save_bitmap(&path).unwrap();

        let back = reopen(&path).to_rgb8();
        assert_eq!(back.dimensions(), (5, 2));
        assert_eq!(back.get_pixel(4, 1), &Rgb([200, 0, 0]));
    }

    #[test]
    fn ndarray_rejects_two_channels() {
        let dir = tempfile::tempdir().unwrap();
        let arr = Array3::<u8>::zeros((2, 2, 2));
        let err = arr.save_bitmap(&dir.path().join("x")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedImage(_)));
    }
}
