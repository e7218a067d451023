// 该文件是 Xingshen （醒神） 项目的一部分。
// src/config.rs - 检测参数配置
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

pub const DEFAULT_INPUT_SIZE: u32 = 640;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.45;
/// 与训练时的填充颜色保持一致
pub const DEFAULT_PAD_COLOR: [u8; 3] = [114, 114, 114];

/// NMS 分组方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NmsMode {
  /// 不区分类别，不同类别的框也会互相抑制
  #[default]
  ClassAgnostic,
  /// 按类别分组后分别抑制
  PerClass,
}

/// 检测流水线参数
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
  /// 网络输入宽度
  pub input_width: u32,
  /// 网络输入高度
  pub input_height: u32,
  /// 置信度阈值
  pub confidence_threshold: f32,
  /// NMS IOU 阈值
  pub nms_threshold: f32,
  /// letterbox 填充颜色
  pub pad_color: [u8; 3],
  pub nms_mode: NmsMode,
}

impl Default for DetectorConfig {
  fn default() -> Self {
    Self {
      input_width: DEFAULT_INPUT_SIZE,
      input_height: DEFAULT_INPUT_SIZE,
      confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
      nms_threshold: DEFAULT_NMS_THRESHOLD,
      pad_color: DEFAULT_PAD_COLOR,
      nms_mode: NmsMode::default(),
    }
  }
}

impl DetectorConfig {
  pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
    self.input_width = width;
    self.input_height = height;
    self
  }

  pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
    self.confidence_threshold = threshold;
    self
  }

  pub fn with_nms_threshold(mut self, threshold: f32) -> Self {
    self.nms_threshold = threshold;
    self
  }

  pub fn with_pad_color(mut self, color: [u8; 3]) -> Self {
    self.pad_color = color;
    self
  }

  pub fn with_nms_mode(mut self, mode: NmsMode) -> Self {
    self.nms_mode = mode;
    self
  }
}
