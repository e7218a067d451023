// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model/decode.rs - YOLO 输出张量解码
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

use tracing::debug;

use crate::{
  config::NmsMode,
  error::VisionError,
  letterbox::LetterboxInfo,
  model::{BoundingBox, Detection, layout::resolve_layout, nms},
};

/// 解码输出张量并执行不区分类别的 NMS
///
/// 返回原图像素坐标下的检测结果，顺序为 NMS 选中顺序。没有检测结果不是错误。
pub fn decode(
  data: &[f32],
  shape: &[usize],
  letterbox: &LetterboxInfo,
  image_w: u32,
  image_h: u32,
  conf_threshold: f32,
  iou_threshold: f32,
) -> Result<Vec<Detection>, VisionError> {
  decode_with_mode(
    data,
    shape,
    letterbox,
    image_w,
    image_h,
    conf_threshold,
    iou_threshold,
    NmsMode::ClassAgnostic,
  )
}

#[allow(clippy::too_many_arguments)]
pub fn decode_with_mode(
  data: &[f32],
  shape: &[usize],
  letterbox: &LetterboxInfo,
  image_w: u32,
  image_h: u32,
  conf_threshold: f32,
  iou_threshold: f32,
  mode: NmsMode,
) -> Result<Vec<Detection>, VisionError> {
  let candidates = decode_candidates(data, shape, letterbox, image_w, image_h, conf_threshold)?;
  debug!("置信度过滤后剩余 {} 个候选框", candidates.len());
  Ok(nms::suppress(
    candidates,
    conf_threshold,
    iou_threshold,
    mode,
  ))
}

/// 逐个候选框解码，只做置信度过滤，不做 NMS
pub fn decode_candidates(
  data: &[f32],
  shape: &[usize],
  letterbox: &LetterboxInfo,
  image_w: u32,
  image_h: u32,
  conf_threshold: f32,
) -> Result<Vec<Detection>, VisionError> {
  if data.is_empty() {
    return Err(VisionError::NullOrEmptyData);
  }
  if image_w == 0 || image_h == 0 {
    return Err(VisionError::InvalidImage {
      width: image_w,
      height: image_h,
    });
  }

  let geometry = resolve_layout(shape)?;
  let required = geometry
    .num_predictions
    .checked_mul(geometry.num_features)
    .ok_or_else(|| VisionError::unsupported(shape, "张量元素数量溢出"))?;
  if data.len() < required {
    return Err(VisionError::unsupported(
      shape,
      format!("数据长度 {} 小于形状要求的 {}", data.len(), required),
    ));
  }

  debug!(
    "输出张量布局 {:?}: {} 个候选框, {} 个类别",
    geometry.layout,
    geometry.num_predictions,
    geometry.num_classes()
  );

  let max_x = (image_w - 1) as f32;
  let max_y = (image_h - 1) as f32;
  let mut candidates = Vec::new();

  for i in 0..geometry.num_predictions {
    let feature = |f: usize| data[geometry.index(i, f)];

    // 严格大于，同分时保留下标较小的类别
    let mut best_score = 0.0f32;
    let mut best_class = None;
    for c in 0..geometry.num_classes() {
      let score = feature(4 + c);
      if score > best_score {
        best_score = score;
        best_class = Some(c);
      }
    }

    let Some(class_id) = best_class else {
      continue;
    };
    if best_score < conf_threshold {
      continue;
    }

    let (cx, cy, w, h) = (feature(0), feature(1), feature(2), feature(3));
    let (x1, y1) = letterbox.to_original(cx - 0.5 * w, cy - 0.5 * h);
    let (x2, y2) = letterbox.to_original(cx + 0.5 * w, cy + 0.5 * h);

    candidates.push(Detection {
      bbox: BoundingBox::from_corners(
        x1.clamp(0.0, max_x),
        y1.clamp(0.0, max_y),
        x2.clamp(0.0, max_x),
        y2.clamp(0.0, max_y),
      ),
      class_id,
      score: best_score,
    });
  }

  Ok(candidates)
}
