// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model.rs - 模型与检测结果
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

use crate::{frame::RgbNchwTensor, labels::ClassLabels, status::DrowsinessStatus};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 外部推理运行时（ONNX Runtime、RKNN 等）的接入点
pub trait InferenceBackend {
  type Error;

  fn run(&self, input: &RgbNchwTensor) -> Result<RawTensor, Self::Error>;
}

/// 推理输出的原始张量，形状为 [1, C, N] 或 [1, N, C]
#[derive(Debug, Clone, PartialEq)]
pub struct RawTensor {
  pub data: Vec<f32>,
  pub shape: Vec<usize>,
}

impl RawTensor {
  pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Self {
    Self { data, shape }
  }
}

/// 原图像素坐标下的边界框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl BoundingBox {
  pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// 由已经裁剪到图像范围内的角点坐标构造，宽高至少为 1
  pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
    Self {
      x: x1 as u32,
      y: y1 as u32,
      width: ((x2 - x1) as u32).max(1),
      height: ((y2 - y1) as u32).max(1),
    }
  }

  pub fn right(&self) -> i64 {
    self.x as i64 + self.width as i64
  }

  pub fn bottom(&self) -> i64 {
    self.y as i64 + self.height as i64
  }

  pub fn area(&self) -> i64 {
    self.width as i64 * self.height as i64
  }

  pub fn iou(&self, other: &BoundingBox) -> f32 {
    let x1 = (self.x as i64).max(other.x as i64);
    let y1 = (self.y as i64).max(other.y as i64);
    let x2 = self.right().min(other.right());
    let y2 = self.bottom().min(other.bottom());

    let intersection = (x2 - x1).max(0) * (y2 - y1).max(0);
    let union = self.area() + other.area() - intersection;

    if union > 0 {
      intersection as f32 / union as f32
    } else {
      0.0
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
  pub bbox: BoundingBox,
  pub class_id: usize,
  pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectItem {
  pub detection: Detection,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectResult {
  pub items: Box<[DetectItem]>,
  pub status: DrowsinessStatus,
}

impl DetectResult {
  pub fn new(detections: Vec<Detection>, labels: &ClassLabels) -> Self {
    let status = DrowsinessStatus::from_detections(&detections, labels);
    let items = detections
      .into_iter()
      .map(|detection| DetectItem {
        label: labels.label(detection.class_id).into_owned(),
        detection,
      })
      .collect();
    Self { items, status }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

pub mod decode;
pub mod layout;
pub mod nms;

mod detector;
pub use self::detector::{DetectorError, YoloDetector};

#[cfg(feature = "tensor_replay")]
mod replay;
#[cfg(feature = "tensor_replay")]
pub use self::replay::{TensorReplayBackend, TensorReplayError};
