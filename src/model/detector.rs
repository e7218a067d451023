// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model/detector.rs - YOLO 检测流水线
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

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::{
  config::DetectorConfig,
  error::VisionError,
  frame::RgbNchwTensor,
  labels::ClassLabels,
  letterbox::Letterbox,
  model::{DetectResult, InferenceBackend, Model, decode::decode_with_mode},
};

#[derive(Error, Debug)]
pub enum DetectorError<E>
where
  E: std::error::Error + 'static,
{
  #[error("后处理错误: {0}")]
  Vision(#[from] VisionError),
  #[error("推理后端错误: {0}")]
  Backend(#[source] E),
}

/// letterbox -> 归一化 -> 推理 -> 解码
pub struct YoloDetector<B> {
  backend: B,
  letterbox: Letterbox,
  config: DetectorConfig,
  labels: ClassLabels,
}

impl<B: InferenceBackend> YoloDetector<B> {
  pub fn new(backend: B, config: DetectorConfig) -> Self {
    Self {
      backend,
      letterbox: Letterbox::from_config(&config),
      config,
      labels: ClassLabels::default(),
    }
  }

  pub fn with_labels(mut self, labels: ClassLabels) -> Self {
    self.labels = labels;
    self
  }

  pub fn config(&self) -> &DetectorConfig {
    &self.config
  }

  pub fn labels(&self) -> &ClassLabels {
    &self.labels
  }
}

impl<B> Model for YoloDetector<B>
where
  B: InferenceBackend,
  B::Error: std::error::Error + 'static,
{
  type Input = RgbImage;
  type Output = DetectResult;
  type Error = DetectorError<B::Error>;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let (padded, info) = self.letterbox.apply(input)?;
    let tensor = RgbNchwTensor::from(&padded);

    debug!("执行模型推理");
    let output = self
      .backend
      .run(&tensor)
      .map_err(DetectorError::Backend)?;
    debug!("模型输出形状: {:?}", output.shape);

    let detections = decode_with_mode(
      &output.data,
      &output.shape,
      &info,
      input.width(),
      input.height(),
      self.config.confidence_threshold,
      self.config.nms_threshold,
      self.config.nms_mode,
    )?;
    debug!("检测到 {} 个物体", detections.len());

    Ok(DetectResult::new(detections, &self.labels))
  }
}
