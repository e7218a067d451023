// 该文件是 Xingshen （醒神） 项目的一部分。
// src/status.rs - 疲劳状态判定
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

use std::fmt;

use crate::{labels::ClassLabels, model::Detection};

const DROWSY_COLOR: [u8; 3] = [255, 0, 0];
const AWAKE_COLOR: [u8; 3] = [0, 255, 0];
const OTHER_COLOR: [u8; 3] = [0, 255, 255];
const NO_DETECTION_COLOR: [u8; 3] = [255, 255, 0];

/// 由当前帧得分最高的检测结果决定的状态
#[derive(Debug, Clone, PartialEq)]
pub enum DrowsinessStatus {
  NoDetection,
  Drowsy(f32),
  Awake(f32),
  Other { label: String, score: f32 },
}

impl DrowsinessStatus {
  pub fn from_detections(detections: &[Detection], labels: &ClassLabels) -> Self {
    // 同分时保留先出现的检测
    let best = detections
      .iter()
      .fold(None::<&Detection>, |best, det| match best {
        Some(b) if !(det.score > b.score) => Some(b),
        _ => Some(det),
      });

    let Some(best) = best else {
      return DrowsinessStatus::NoDetection;
    };

    let label = labels.label(best.class_id);
    let lower = label.to_lowercase();
    if lower.contains("drowsy") {
      DrowsinessStatus::Drowsy(best.score)
    } else if lower.contains("awake") {
      DrowsinessStatus::Awake(best.score)
    } else {
      DrowsinessStatus::Other {
        label: label.into_owned(),
        score: best.score,
      }
    }
  }

  pub fn is_drowsy(&self) -> bool {
    matches!(self, DrowsinessStatus::Drowsy(_))
  }

  /// 状态文字的显示颜色（RGB）
  pub fn color(&self) -> [u8; 3] {
    match self {
      DrowsinessStatus::NoDetection => NO_DETECTION_COLOR,
      DrowsinessStatus::Drowsy(_) => DROWSY_COLOR,
      DrowsinessStatus::Awake(_) => AWAKE_COLOR,
      DrowsinessStatus::Other { .. } => OTHER_COLOR,
    }
  }
}

impl fmt::Display for DrowsinessStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DrowsinessStatus::NoDetection => write!(f, "NO DETECTION"),
      DrowsinessStatus::Drowsy(score) => write!(f, "DROWSY {:.2}", score),
      DrowsinessStatus::Awake(score) => write!(f, "AWAKE {:.2}", score),
      DrowsinessStatus::Other { label, score } => write!(f, "{} {:.2}", label, score),
    }
  }
}
