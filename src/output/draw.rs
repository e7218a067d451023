// 该文件是 Xingshen （醒神） 项目的一部分。
// src/output/draw.rs - 目标检测结果可视化
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

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::model::{BoundingBox, DetectItem, DetectResult};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 18.0;
const STATUS_FONT_SIZE: f32 = 32.0;
const LABEL_TEXT_VERTICAL_PADDING: i32 = 2;
const BOX_THICKNESS: u32 = 2;
const BOX_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const STATUS_ORIGIN: (i32, i32) = (20, 12);
// 没有字体时用色块表示状态
const STATUS_BADGE_SIZE: u32 = 24;

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("读取字体文件失败: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体文件无效: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

pub struct Draw {
  font: Option<FontVec>,
  box_color: [u8; 3],
  box_thickness: u32,
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      font: None,
      box_color: BOX_COLOR,
      box_thickness: BOX_THICKNESS,
    }
  }
}

impl Draw {
  /// 加载字体后才会绘制标签文字
  pub fn with_font_file(mut self, path: impl AsRef<Path>) -> Result<Self, DrawError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    self.font = Some(FontVec::try_from_vec(data)?);
    info!("加载字体: {}", path.display());
    Ok(self)
  }

  pub fn draw_result(&self, image: &mut RgbImage, result: &DetectResult) {
    for item in result.items.iter() {
      self.draw_item(image, item);
    }
    self.draw_status(image, &result.status.to_string(), result.status.color());
  }

  fn draw_item(&self, image: &mut RgbImage, item: &DetectItem) {
    let Some(bbox) = clip_to_image(&item.detection.bbox, image) else {
      return;
    };
    let color = Rgb(self.box_color);

    // 向内加粗
    for t in 0..self.box_thickness {
      let w = bbox.width.saturating_sub(2 * t);
      let h = bbox.height.saturating_sub(2 * t);
      if w == 0 || h == 0 {
        break;
      }
      let rect = Rect::at((bbox.x + t) as i32, (bbox.y + t) as i32).of_size(w, h);
      draw_hollow_rect_mut(image, rect, color);
    }

    let Some(font) = &self.font else {
      return;
    };
    let label = format!("{} {:.2}", item.label, item.detection.score);
    let scale = PxScale::from(LABEL_FONT_SIZE);
    let (text_w, text_h) = text_size(scale, font, &label);
    let text_h = text_h as i32 + 2 * LABEL_TEXT_VERTICAL_PADDING;

    // 标签放在边框上方，放不下时贴着图像顶部
    let label_x = bbox.x as i32;
    let label_y = (bbox.y as i32 - text_h).max(0);
    let label_w = text_w.min(image.width() - bbox.x);
    if label_w > 0 {
      let rect = Rect::at(label_x, label_y).of_size(label_w, text_h as u32);
      draw_filled_rect_mut(image, rect, color);
      draw_text_mut(
        image,
        Rgb(TEXT_COLOR),
        label_x,
        label_y + LABEL_TEXT_VERTICAL_PADDING,
        scale,
        font,
        &label,
      );
    }
  }

  fn draw_status(&self, image: &mut RgbImage, text: &str, color: [u8; 3]) {
    let (x, y) = STATUS_ORIGIN;
    match &self.font {
      Some(font) => draw_text_mut(
        image,
        Rgb(color),
        x,
        y,
        PxScale::from(STATUS_FONT_SIZE),
        font,
        text,
      ),
      None => {
        let rect = Rect::at(x, y).of_size(STATUS_BADGE_SIZE, STATUS_BADGE_SIZE);
        draw_filled_rect_mut(image, rect, Rgb(color));
      }
    }
  }
}

/// `?font=<path>` 指定标签字体
pub(crate) fn draw_from_query(uri: &Url) -> Result<Draw, DrawError> {
  let font = uri
    .query_pairs()
    .find(|(k, _)| k == "font")
    .map(|(_, v)| v.into_owned());
  match font {
    Some(path) => Draw::default().with_font_file(path),
    None => {
      warn!("未指定字体 (?font=), 只绘制边框和状态色块, 不绘制文字");
      Ok(Draw::default())
    }
  }
}

/// 裁剪到图像范围内，完全在图像外时返回 None
fn clip_to_image(bbox: &BoundingBox, image: &RgbImage) -> Option<BoundingBox> {
  let (w, h) = image.dimensions();
  if bbox.x >= w || bbox.y >= h {
    return None;
  }
  Some(BoundingBox::new(
    bbox.x,
    bbox.y,
    bbox.width.min(w - bbox.x).max(1),
    bbox.height.min(h - bbox.y).max(1),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    labels::ClassLabels,
    model::{Detection, DetectResult},
  };

  fn result_with(bbox: BoundingBox, class_id: usize) -> DetectResult {
    DetectResult::new(
      vec![Detection {
        bbox,
        class_id,
        score: 0.9,
      }],
      &ClassLabels::new(vec!["awake".into(), "drowsy".into()]),
    )
  }

  #[test]
  fn box_outline_is_drawn() {
    let mut image = RgbImage::new(200, 200);
    Draw::default().draw_result(&mut image, &result_with(BoundingBox::new(100, 120, 50, 40), 0));

    let blue = Rgb(BOX_COLOR);
    assert_eq!(*image.get_pixel(100, 120), blue);
    assert_eq!(*image.get_pixel(101, 121), blue);
    assert_eq!(*image.get_pixel(149, 159), blue);
    assert_eq!(*image.get_pixel(125, 140), Rgb([0, 0, 0]));
  }

  #[test]
  fn status_badge_uses_status_color() {
    let mut image = RgbImage::new(200, 200);
    Draw::default().draw_result(&mut image, &result_with(BoundingBox::new(100, 120, 50, 40), 1));
    assert_eq!(*image.get_pixel(25, 20), Rgb([255, 0, 0]));

    let mut image = RgbImage::new(200, 200);
    let empty = DetectResult::new(Vec::new(), &ClassLabels::default());
    Draw::default().draw_result(&mut image, &empty);
    assert_eq!(*image.get_pixel(25, 20), Rgb([255, 255, 0]));
  }

  #[test]
  fn boxes_touching_the_edge_are_clipped() {
    let mut image = RgbImage::new(64, 64);
    Draw::default().draw_result(&mut image, &result_with(BoundingBox::new(63, 63, 10, 10), 0));
    assert_eq!(*image.get_pixel(63, 63), Rgb(BOX_COLOR));
  }

  #[test]
  fn query_without_font_draws_badge_only() {
    let draw = draw_from_query(&Url::parse("folder:///tmp/frames?always").unwrap()).unwrap();
    assert!(draw.font.is_none());

    let mut image = RgbImage::new(200, 200);
    draw.draw_result(&mut image, &result_with(BoundingBox::new(100, 120, 50, 40), 0));
    assert_eq!(*image.get_pixel(25, 20), Rgb([0, 255, 0]));
  }

  #[test]
  fn invalid_font_is_rejected() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not a font").unwrap();
    assert!(matches!(
      Draw::default().with_font_file(file.path()),
      Err(DrawError::InvalidFont(_))
    ));
  }
}
