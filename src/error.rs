// 该文件是 Xingshen （醒神） 项目的一部分。
// src/error.rs - 后处理错误定义
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

use thiserror::Error;

/// 单帧处理失败的原因，调用方应跳过该帧继续处理下一帧
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisionError {
  #[error("图像尺寸无效: {width}x{height}")]
  InvalidImage { width: u32, height: u32 },
  #[error("不支持的输出张量形状 {shape:?}: {reason}")]
  UnsupportedShape { shape: Vec<usize>, reason: String },
  #[error("输出张量数据为空")]
  NullOrEmptyData,
}

impl VisionError {
  pub fn unsupported(shape: &[usize], reason: impl Into<String>) -> Self {
    VisionError::UnsupportedShape {
      shape: shape.to_vec(),
      reason: reason.into(),
    }
  }
}
