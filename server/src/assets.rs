//! Sprites shipped to clients inside every full-state result.
//!
//! Rendered once at start-up as base64 PNGs and shared read-only afterwards.

use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError, Rgba, RgbaImage};
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to encode sprite '{name}': {source}")]
    Encode {
        name: &'static str,
        #[source]
        source: ImageError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderAssets {
    pub black_gem: String,
    pub white_gem: String,
    pub black_hazard: String,
    pub white_hazard: String,
    pub exit: String,
    pub wall: String,
}

impl RenderAssets {
    pub fn generate() -> Result<Self, AssetError> {
        let assets = Self {
            black_gem: Sprite::new(20, 20, Shape::Diamond, [50, 50, 50, 255])
                .border([255, 255, 255], 2)
                .encode("black_gem")?,
            white_gem: Sprite::new(20, 20, Shape::Diamond, [255, 255, 255, 255])
                .border([0, 0, 0], 2)
                .encode("white_gem")?,
            black_hazard: Sprite::new(20, 20, Shape::Square, [39, 45, 67, 255])
                .border([255, 255, 255], 2)
                .encode("black_hazard")?,
            white_hazard: Sprite::new(20, 20, Shape::Square, [184, 115, 57, 255])
                .border([0, 0, 0], 2)
                .encode("white_hazard")?,
            exit: Sprite::new(80, 80, Shape::Door, [50, 200, 50, 200])
                .border([20, 100, 20], 2)
                .encode("exit")?,
            wall: Sprite::new(20, 20, Shape::Brick, [100, 100, 100, 255])
                .border([50, 50, 50], 1)
                .encode("wall")?,
        };
        info!("Render assets generated");
        Ok(assets)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Square,
    Diamond,
    Door,
    Brick,
}

#[derive(Debug, Clone, Copy)]
struct Sprite {
    width: u32,
    height: u32,
    shape: Shape,
    fill: [u8; 4],
    border: Option<([u8; 3], u32)>,
}

impl Sprite {
    fn new(width: u32, height: u32, shape: Shape, fill: [u8; 4]) -> Self {
        Self {
            width,
            height,
            shape,
            fill,
            border: None,
        }
    }

    fn border(mut self, color: [u8; 3], width: u32) -> Self {
        self.border = Some((color, width));
        self
    }

    /// Normalized diamond distance: <= 1.0 is inside.
    fn diamond_distance(&self, x: u32, y: u32) -> f32 {
        let (hw, hh) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        let dx = (x as f32 + 0.5 - hw).abs() / hw;
        let dy = (y as f32 + 0.5 - hh).abs() / hh;
        dx + dy
    }

    fn is_knob(&self, x: u32, y: u32) -> bool {
        let (w, h) = (self.width as f32, self.height as f32);
        let (cx, cy) = (w * 0.8, h * 0.5);
        let (rx, ry) = (w * 0.1, h * 0.1);
        let dx = (x as f32 + 0.5 - cx) / rx;
        let dy = (y as f32 + 0.5 - cy) / ry;
        dx * dx + dy * dy <= 1.0
    }

    fn render(&self) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 0]));
        let fill = Rgba(self.fill);
        let [r, g, b, _] = self.fill;
        let mortar = Rgba([r / 2, g / 2, b / 2, 255]);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = match self.shape {
                Shape::Square => fill,
                Shape::Diamond if self.diamond_distance(x, y) <= 1.0 => fill,
                Shape::Diamond => continue,
                Shape::Door if self.is_knob(x, y) => Rgba([50, 50, 50, 255]),
                Shape::Door => fill,
                Shape::Brick if y % 10 == 0 || x % 20 == 0 => mortar,
                Shape::Brick => fill,
            };
        }

        if let Some((color, width)) = self.border {
            let outline = Rgba([color[0], color[1], color[2], 255]);
            let band = width as f32 / (self.width as f32 / 2.0);
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                let on_edge = match self.shape {
                    Shape::Diamond => {
                        let d = self.diamond_distance(x, y);
                        d <= 1.0 && d > 1.0 - band
                    }
                    _ => {
                        x < width
                            || y < width
                            || x >= self.width.saturating_sub(width)
                            || y >= self.height.saturating_sub(width)
                    }
                };
                if on_edge {
                    *pixel = outline;
                }
            }
        }

        img
    }

    fn encode(&self, name: &'static str) -> Result<String, AssetError> {
        let img = self.render();
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(img.as_raw(), self.width, self.height, ColorType::Rgba8)
            .map_err(|source| AssetError::Encode { name, source })?;
        Ok(general_purpose::STANDARD.encode(png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_all_assets_are_png() {
        let assets = RenderAssets::generate().unwrap();
        for encoded in [
            &assets.black_gem,
            &assets.white_gem,
            &assets.black_hazard,
            &assets.white_hazard,
            &assets.exit,
            &assets.wall,
        ] {
            let bytes = general_purpose::STANDARD.decode(encoded).unwrap();
            assert_eq!(bytes[..8], PNG_MAGIC);
        }
    }

    #[test]
    fn test_diamond_corners_are_transparent() {
        let img = Sprite::new(20, 20, Shape::Diamond, [50, 50, 50, 255]).render();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(19, 19)[3], 0);
        assert_eq!(*img.get_pixel(10, 10), Rgba([50, 50, 50, 255]));
    }

    #[test]
    fn test_square_border() {
        let img = Sprite::new(20, 20, Shape::Square, [39, 45, 67, 255])
            .border([255, 255, 255], 2)
            .render();
        assert_eq!(*img.get_pixel(0, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(19, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(10, 10), Rgba([39, 45, 67, 255]));
    }

    #[test]
    fn test_door_has_knob() {
        let img = Sprite::new(80, 80, Shape::Door, [50, 200, 50, 200]).render();
        assert_eq!(*img.get_pixel(64, 40), Rgba([50, 50, 50, 255]));
        assert_eq!(*img.get_pixel(20, 40), Rgba([50, 200, 50, 200]));
    }

    #[test]
    fn test_brick_mortar_lines() {
        let img = Sprite::new(20, 20, Shape::Brick, [100, 100, 100, 255]).render();
        assert_eq!(*img.get_pixel(5, 10), Rgba([50, 50, 50, 255]));
        assert_eq!(*img.get_pixel(5, 5), Rgba([100, 100, 100, 255]));
    }
}
