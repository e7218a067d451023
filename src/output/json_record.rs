// 该文件是 Xingshen （醒神） 项目的一部分。
// src/output/json_record.rs - 以 JSON Lines 记录检测结果
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

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
  sync::Mutex,
};

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::DetectResult,
  output::Render,
  url_to_path,
};

#[derive(Error, Debug)]
pub enum JsonRecordError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("记录文件锁已失效")]
  Poisoned,
}

struct RecordWriter {
  writer: BufWriter<File>,
  frame_index: u64,
}

/// 每帧一行 JSON
pub struct JsonRecordOutput {
  inner: Mutex<RecordWriter>,
}

impl FromUrlWithScheme for JsonRecordOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonRecordOutput {
  type Error = JsonRecordError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(JsonRecordError::SchemeMismatch);
    }
    Self::create(url_to_path(uri))
  }
}

impl JsonRecordOutput {
  pub fn create(path: impl AsRef<Path>) -> Result<Self, JsonRecordError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    info!("检测记录写入: {}", path.display());
    Ok(Self {
      inner: Mutex::new(RecordWriter {
        writer: BufWriter::new(file),
        frame_index: 0,
      }),
    })
  }
}

/// 单帧记录，序列化为一行 JSON
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
  pub frame: u64,
  pub status: String,
  pub drowsy: bool,
  pub detections: Vec<DetectionRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DetectionRecord<'a> {
  pub class_id: usize,
  pub label: &'a str,
  pub score: f32,
  /// [x, y, width, height]
  #[serde(rename = "box")]
  pub bbox: [u32; 4],
}

impl<'a> FrameRecord<'a> {
  pub fn new(frame: u64, result: &'a DetectResult) -> Self {
    let detections = result
      .items
      .iter()
      .map(|item| {
        let b = item.detection.bbox;
        DetectionRecord {
          class_id: item.detection.class_id,
          label: &item.label,
          score: item.detection.score,
          bbox: [b.x, b.y, b.width, b.height],
        }
      })
      .collect();

    Self {
      frame,
      status: result.status.to_string(),
      drowsy: result.status.is_drowsy(),
      detections,
    }
  }
}

impl Render<RgbImage, DetectResult> for JsonRecordOutput {
  type Error = JsonRecordError;

  fn render_result(&self, _frame: &RgbImage, result: &DetectResult) -> Result<(), Self::Error> {
    let mut inner = self.inner.lock().map_err(|_| JsonRecordError::Poisoned)?;
    inner.frame_index += 1;
    let record = FrameRecord::new(inner.frame_index, result);
    serde_json::to_writer(&mut inner.writer, &record)?;
    inner.writer.write_all(b"\n")?;
    inner.writer.flush()?;
    Ok(())
  }
}
