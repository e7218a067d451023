// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model/nms.rs - 非极大值抑制
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

use crate::{config::NmsMode, model::Detection};

/// 贪心 NMS：按分数降序依次保留，丢弃与已保留框 IoU >= `iou_threshold` 的候选
///
/// 分数低于 `score_threshold` 的候选直接丢弃。返回顺序即选中顺序。
pub fn suppress(
  mut candidates: Vec<Detection>,
  score_threshold: f32,
  iou_threshold: f32,
  mode: NmsMode,
) -> Vec<Detection> {
  candidates.retain(|det| det.score >= score_threshold);
  // 稳定排序，同分时保持输入顺序
  candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

  let mut keep: Vec<Detection> = Vec::with_capacity(candidates.len());
  for det in candidates {
    let suppressed = keep.iter().any(|kept| {
      let same_group = match mode {
        NmsMode::ClassAgnostic => true,
        NmsMode::PerClass => kept.class_id == det.class_id,
      };
      same_group && kept.bbox.iou(&det.bbox) >= iou_threshold
    });
    if !suppressed {
      keep.push(det);
    }
  }

  debug!("NMS 后剩余 {} 个检测框", keep.len());
  keep
}

/// 不区分类别的 NMS
pub fn non_max_suppression(
  candidates: Vec<Detection>,
  score_threshold: f32,
  iou_threshold: f32,
) -> Vec<Detection> {
  suppress(
    candidates,
    score_threshold,
    iou_threshold,
    NmsMode::ClassAgnostic,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::BoundingBox;

  fn det(x: u32, y: u32, w: u32, h: u32, class_id: usize, score: f32) -> Detection {
    Detection {
      bbox: BoundingBox::new(x, y, w, h),
      class_id,
      score,
    }
  }

  #[test]
  fn overlapping_duplicate_is_removed() {
    let kept = non_max_suppression(
      vec![det(0, 0, 100, 90, 0, 0.8), det(0, 0, 100, 100, 0, 0.9)],
      0.5,
      0.45,
    );
    assert_eq!(kept, vec![det(0, 0, 100, 100, 0, 0.9)]);
  }

  #[test]
  fn output_is_in_selection_order() {
    let kept = non_max_suppression(
      vec![
        det(0, 0, 10, 10, 0, 0.6),
        det(100, 100, 10, 10, 1, 0.95),
        det(200, 200, 10, 10, 0, 0.7),
      ],
      0.5,
      0.45,
    );
    let scores: Vec<f32> = kept.iter().map(|d| d.score).collect();
    assert_eq!(scores, vec![0.95, 0.7, 0.6]);
  }

  #[test]
  fn classes_suppress_each_other_by_default() {
    let candidates = vec![det(0, 0, 100, 100, 0, 0.9), det(0, 0, 100, 100, 1, 0.8)];
    assert_eq!(non_max_suppression(candidates.clone(), 0.5, 0.45).len(), 1);
    assert_eq!(
      suppress(candidates, 0.5, 0.45, NmsMode::PerClass).len(),
      2
    );
  }

  #[test]
  fn iou_equal_to_threshold_is_suppressed() {
    // IoU = 50 / 100 = 0.5
    let candidates = vec![det(0, 0, 100, 100, 0, 0.9), det(0, 0, 100, 50, 0, 0.8)];
    assert_eq!(non_max_suppression(candidates.clone(), 0.0, 0.5).len(), 1);
    assert_eq!(non_max_suppression(candidates, 0.0, 0.51).len(), 2);
  }

  #[test]
  fn score_floor_is_applied() {
    let candidates = vec![det(0, 0, 10, 10, 0, 0.5), det(50, 50, 10, 10, 0, 0.49)];
    let kept = non_max_suppression(candidates, 0.5, 0.45);
    assert_eq!(kept, vec![det(0, 0, 10, 10, 0, 0.5)]);
  }

  #[test]
  fn rerunning_is_idempotent() {
    let candidates = vec![
      det(0, 0, 100, 100, 0, 0.9),
      det(10, 10, 100, 100, 1, 0.85),
      det(60, 60, 100, 100, 0, 0.8),
      det(300, 300, 40, 40, 1, 0.7),
      det(305, 305, 40, 40, 1, 0.65),
    ];
    let once = non_max_suppression(candidates, 0.5, 0.45);
    let twice = non_max_suppression(once.clone(), 0.5, 0.45);
    assert_eq!(once, twice);
  }

  #[test]
  fn empty_input_is_empty_output() {
    assert!(non_max_suppression(Vec::new(), 0.5, 0.45).is_empty());
  }
}
