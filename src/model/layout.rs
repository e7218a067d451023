// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model/layout.rs - 输出张量布局判定
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

use crate::error::VisionError;

/// 4 个框坐标 + 至少 1 个类别分数
pub const MIN_FEATURES: usize = 5;
const BOX_FEATURES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
  /// [1, C, N]，同一特征的各候选框连续存放
  ChannelsFirst,
  /// [1, N, C]，每个候选框的特征连续存放
  ChannelsLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorGeometry {
  pub layout: TensorLayout,
  pub num_predictions: usize,
  pub num_features: usize,
}

impl TensorGeometry {
  pub fn num_classes(&self) -> usize {
    self.num_features - BOX_FEATURES
  }

  /// 第 `prediction` 个候选框第 `feature` 个特征在扁平数组中的下标
  #[inline]
  pub fn index(&self, prediction: usize, feature: usize) -> usize {
    match self.layout {
      TensorLayout::ChannelsFirst => feature * self.num_predictions + prediction,
      TensorLayout::ChannelsLast => prediction * self.num_features + feature,
    }
  }
}

/// 根据形状推断布局：`s1 < s2` 视为 [1, C, N]，否则视为 [1, N, C]
///
/// 该启发式假设特征数（4 + 类别数）小于候选框数量。
pub fn resolve_layout(shape: &[usize]) -> Result<TensorGeometry, VisionError> {
  let &[batch, s1, s2] = shape else {
    return Err(VisionError::unsupported(
      shape,
      format!("期望 3 维张量，实际为 {} 维", shape.len()),
    ));
  };

  if batch != 1 {
    return Err(VisionError::unsupported(
      shape,
      format!("仅支持 batch = 1，实际为 {}", batch),
    ));
  }

  let geometry = if s1 < s2 {
    TensorGeometry {
      layout: TensorLayout::ChannelsFirst,
      num_predictions: s2,
      num_features: s1,
    }
  } else {
    TensorGeometry {
      layout: TensorLayout::ChannelsLast,
      num_predictions: s1,
      num_features: s2,
    }
  };

  if geometry.num_features < MIN_FEATURES {
    return Err(VisionError::unsupported(
      shape,
      format!(
        "特征通道数 {} 小于 {}",
        geometry.num_features, MIN_FEATURES
      ),
    ));
  }

  Ok(geometry)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn narrow_middle_dimension_is_channels_first() {
    let geometry = resolve_layout(&[1, 8, 100]).unwrap();
    assert_eq!(geometry.layout, TensorLayout::ChannelsFirst);
    assert_eq!(geometry.num_features, 8);
    assert_eq!(geometry.num_predictions, 100);
    assert_eq!(geometry.num_classes(), 4);
  }

  #[test]
  fn wide_middle_dimension_is_channels_last() {
    let geometry = resolve_layout(&[1, 100, 8]).unwrap();
    assert_eq!(geometry.layout, TensorLayout::ChannelsLast);
    assert_eq!(geometry.num_features, 8);
    assert_eq!(geometry.num_predictions, 100);
  }

  #[test]
  fn equal_dimensions_resolve_to_channels_last() {
    let geometry = resolve_layout(&[1, 6, 6]).unwrap();
    assert_eq!(geometry.layout, TensorLayout::ChannelsLast);
  }

  #[test]
  fn indexing_follows_layout() {
    let first = resolve_layout(&[1, 6, 10]).unwrap();
    assert_eq!(first.index(3, 0), 3);
    assert_eq!(first.index(3, 2), 23);
    let last = resolve_layout(&[1, 10, 6]).unwrap();
    assert_eq!(last.index(3, 0), 18);
    assert_eq!(last.index(3, 2), 20);
  }

  #[test]
  fn too_few_features_is_rejected() {
    assert!(matches!(
      resolve_layout(&[1, 4, 100]),
      Err(VisionError::UnsupportedShape { .. })
    ));
    assert!(matches!(
      resolve_layout(&[1, 100, 4]),
      Err(VisionError::UnsupportedShape { .. })
    ));
  }

  #[test]
  fn wrong_rank_or_batch_is_rejected() {
    for shape in [&[8, 100][..], &[1, 1, 8, 100][..], &[][..], &[2, 8, 100][..]] {
      assert!(
        matches!(
          resolve_layout(shape),
          Err(VisionError::UnsupportedShape { .. })
        ),
        "{shape:?}"
      );
    }
  }
}
