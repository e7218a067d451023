// 该文件是 Xingshen （醒神） 项目的一部分。
// src/letterbox.rs - 保持宽高比的缩放与填充
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{Rgb, RgbImage, imageops};
use tracing::debug;

use crate::{
  config::{DEFAULT_PAD_COLOR, DetectorConfig},
  error::VisionError,
};

/// letterbox 变换参数，用于把网络输入坐标还原到原图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
  /// 统一缩放系数 min(target_w / src_w, target_h / src_h)
  pub scale: f32,
  /// 左侧填充宽度
  pub pad_x: u32,
  /// 顶部填充高度
  pub pad_y: u32,
}

impl LetterboxInfo {
  pub fn identity() -> Self {
    Self {
      scale: 1.0,
      pad_x: 0,
      pad_y: 0,
    }
  }

  /// 原图坐标 -> 网络输入坐标
  pub fn to_letterbox(&self, x: f32, y: f32) -> (f32, f32) {
    (
      x * self.scale + self.pad_x as f32,
      y * self.scale + self.pad_y as f32,
    )
  }

  /// 网络输入坐标 -> 原图坐标
  pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
    (
      (x - self.pad_x as f32) / self.scale,
      (y - self.pad_y as f32) / self.scale,
    )
  }
}

/// letterbox 画布
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letterbox {
  width: u32,
  height: u32,
  fill: [u8; 3],
}

impl Letterbox {
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      fill: DEFAULT_PAD_COLOR,
    }
  }

  pub fn with_fill(mut self, fill: [u8; 3]) -> Self {
    self.fill = fill;
    self
  }

  pub fn from_config(config: &DetectorConfig) -> Self {
    Self::new(config.input_width, config.input_height).with_fill(config.pad_color)
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn apply(&self, src: &RgbImage) -> Result<(RgbImage, LetterboxInfo), VisionError> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
      return Err(VisionError::InvalidImage {
        width: src_w,
        height: src_h,
      });
    }
    if self.width == 0 || self.height == 0 {
      return Err(VisionError::InvalidImage {
        width: self.width,
        height: self.height,
      });
    }

    let scale = (self.width as f64 / src_w as f64).min(self.height as f64 / src_h as f64);
    let new_w = ((src_w as f64 * scale).round() as u32).clamp(1, self.width);
    let new_h = ((src_h as f64 * scale).round() as u32).clamp(1, self.height);

    // 奇数填充时左/上比右/下少一个像素
    let pad_x = (self.width - new_w) / 2;
    let pad_y = (self.height - new_h) / 2;

    debug!(
      "letterbox: {}x{} -> {}x{}, 缩放 {:.4}, 填充 ({}, {})",
      src_w, src_h, new_w, new_h, scale, pad_x, pad_y
    );

    let mut canvas = RgbImage::from_pixel(self.width, self.height, Rgb(self.fill));
    if (new_w, new_h) == (src_w, src_h) {
      imageops::replace(&mut canvas, src, pad_x as i64, pad_y as i64);
    } else {
      let resized = imageops::resize(src, new_w, new_h, imageops::FilterType::Triangle);
      imageops::replace(&mut canvas, &resized, pad_x as i64, pad_y as i64);
    }

    Ok((
      canvas,
      LetterboxInfo {
        scale: scale as f32,
        pad_x,
        pad_y,
      },
    ))
  }
}

/// 以默认填充颜色把图像放进 target_w x target_h 的画布
pub fn letterbox(
  src: &RgbImage,
  target_w: u32,
  target_h: u32,
) -> Result<(RgbImage, LetterboxInfo), VisionError> {
  Letterbox::new(target_w, target_h).apply(src)
}

#[cfg(test)]
mod tests {
  use super::*;

  const GRAY: Rgb<u8> = Rgb([114, 114, 114]);

  fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
  }

  #[test]
  fn landscape_frame_is_padded_vertically() {
    let src = solid(1280, 720, [200, 10, 10]);
    let (out, info) = letterbox(&src, 640, 640).unwrap();

    assert_eq!(out.dimensions(), (640, 640));
    assert_eq!(info.scale, 0.5);
    assert_eq!(info.pad_x, 0);
    assert_eq!(info.pad_y, 140);
    assert_eq!(*out.get_pixel(320, 139), GRAY);
    assert_eq!(*out.get_pixel(320, 140), Rgb([200, 10, 10]));
    assert_eq!(*out.get_pixel(320, 499), Rgb([200, 10, 10]));
    assert_eq!(*out.get_pixel(320, 500), GRAY);
  }

  #[test]
  fn odd_padding_puts_extra_pixel_on_bottom() {
    let src = solid(100, 33, [10, 20, 30]);
    let (out, info) = letterbox(&src, 64, 64).unwrap();

    // round(33 * 0.64) = 21, 填充合计 43 = 21 + 22
    assert_eq!(out.dimensions(), (64, 64));
    assert_eq!(info.pad_x, 0);
    assert_eq!(info.pad_y, 21);
    assert_eq!(*out.get_pixel(10, 20), GRAY);
    assert_eq!(*out.get_pixel(10, 21), Rgb([10, 20, 30]));
    assert_eq!(*out.get_pixel(10, 41), Rgb([10, 20, 30]));
    assert_eq!(*out.get_pixel(10, 42), GRAY);
    assert_eq!(*out.get_pixel(10, 63), GRAY);
  }

  #[test]
  fn padding_adds_up_to_canvas() {
    for &(w, h) in &[(1, 1), (3, 7), (641, 480), (480, 641), (1920, 1080), (7, 1000)] {
      let src = solid(w, h, [1, 2, 3]);
      let (out, info) = letterbox(&src, 640, 640).unwrap();
      assert_eq!(out.dimensions(), (640, 640));

      let new_w = (w as f32 * info.scale).round() as u32;
      let new_h = (h as f32 * info.scale).round() as u32;
      let right = 640 - new_w - info.pad_x;
      let bottom = 640 - new_h - info.pad_y;
      assert!(right == info.pad_x || right == info.pad_x + 1, "{w}x{h}");
      assert!(bottom == info.pad_y || bottom == info.pad_y + 1, "{w}x{h}");
    }
  }

  #[test]
  fn small_frame_is_upscaled() {
    let src = solid(320, 160, [5, 5, 5]);
    let (out, info) = letterbox(&src, 640, 640).unwrap();
    assert_eq!(out.dimensions(), (640, 640));
    assert_eq!(info.scale, 2.0);
    assert_eq!((info.pad_x, info.pad_y), (0, 160));
  }

  #[test]
  fn same_size_frame_is_untouched() {
    let mut src = solid(640, 640, [0, 0, 0]);
    src.put_pixel(17, 33, Rgb([255, 1, 2]));
    let (out, info) = letterbox(&src, 640, 640).unwrap();
    assert_eq!(info, LetterboxInfo::identity());
    assert_eq!(out, src);
  }

  #[test]
  fn custom_fill_color() {
    let src = solid(200, 100, [0, 0, 0]);
    let (out, _) = Letterbox::new(64, 64)
      .with_fill([1, 2, 3])
      .apply(&src)
      .unwrap();
    assert_eq!(*out.get_pixel(0, 0), Rgb([1, 2, 3]));
  }

  #[test]
  fn empty_image_is_rejected() {
    let src = RgbImage::new(0, 10);
    assert_eq!(
      letterbox(&src, 640, 640).unwrap_err(),
      VisionError::InvalidImage {
        width: 0,
        height: 10
      }
    );
    let src = RgbImage::new(10, 0);
    assert!(matches!(
      letterbox(&src, 640, 640),
      Err(VisionError::InvalidImage { .. })
    ));
  }

  #[test]
  fn coordinate_mapping_inverts() {
    let src = solid(1280, 720, [0, 0, 0]);
    let (_, info) = letterbox(&src, 640, 640).unwrap();
    let (lx, ly) = info.to_letterbox(400.0, 300.0);
    assert_eq!((lx, ly), (200.0, 290.0));
    let (ox, oy) = info.to_original(lx, ly);
    assert!((ox - 400.0).abs() < 1e-3);
    assert!((oy - 300.0).abs() < 1e-3);
  }
}
