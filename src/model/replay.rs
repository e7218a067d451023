// 该文件是 Xingshen （醒神） 项目的一部分。
// src/model/replay.rs - 回放录制的推理输出
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

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  url_to_path,
  frame::RgbNchwTensor,
  model::{InferenceBackend, RawTensor},
};

#[derive(Error, Debug)]
pub enum TensorReplayError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 解析错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("张量文件格式错误: {0}")]
  FormatError(String),
}

/// 从 JSON 文件 `{"shape": [1, C, N], "data": [...]}` 读取输出张量，每次推理都返回同一张量
#[derive(Debug, Clone)]
pub struct TensorReplayBackend {
  tensor: RawTensor,
}

impl FromUrlWithScheme for TensorReplayBackend {
  const SCHEME: &'static str = "tensor";
}

impl FromUrl for TensorReplayBackend {
  type Error = TensorReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(TensorReplayError::SchemeMismatch(format!(
        "期望 '{}', 实际 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }
    Self::from_path(url_to_path(url))
  }
}

impl TensorReplayBackend {
  pub fn new(tensor: RawTensor) -> Self {
    Self { tensor }
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TensorReplayError> {
    let path = path.as_ref();
    info!("加载张量文件: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let tensor = parse_tensor(&text)?;
    debug!(
      "张量形状: {:?}, 元素数量: {}",
      tensor.shape,
      tensor.data.len()
    );
    Ok(Self::new(tensor))
  }

  pub fn tensor(&self) -> &RawTensor {
    &self.tensor
  }
}

impl InferenceBackend for TensorReplayBackend {
  type Error = TensorReplayError;

  fn run(&self, input: &RgbNchwTensor) -> Result<RawTensor, Self::Error> {
    debug!("回放张量，输入形状: {:?}", input.shape());
    Ok(self.tensor.clone())
  }
}

/// 录制文件的结构
#[derive(Debug, Deserialize)]
struct TensorFile {
  shape: Vec<usize>,
  data: Vec<f32>,
}

pub fn parse_tensor(text: &str) -> Result<RawTensor, TensorReplayError> {
  let TensorFile { shape, data } = serde_json::from_str(text)?;

  let expected: usize = shape.iter().product();
  if shape.is_empty() || expected != data.len() {
    return Err(TensorReplayError::FormatError(format!(
      "形状 {:?} 需要 {} 个元素, 实际 {} 个",
      shape,
      expected,
      data.len()
    )));
  }

  Ok(RawTensor::new(data, shape))
}
