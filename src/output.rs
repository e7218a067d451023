// 该文件是 Xingshen （醒神） 项目的一部分。
// src/output.rs - 输出定义
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
use tracing::info;
use url::Url;

use crate::{FromUrl, model::DetectResult};
#[cfg(any(
  feature = "save_image_file",
  feature = "directory_record",
  feature = "json_record"
))]
use crate::FromUrlWithScheme;

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub mod draw;

#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[cfg(feature = "json_record")]
mod json_record;
#[cfg(feature = "json_record")]
pub use self::json_record::{DetectionRecord, FrameRecord, JsonRecordError, JsonRecordOutput};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[cfg(feature = "json_record")]
  #[error("JSON 记录输出错误: {0}")]
  JsonRecordError(#[from] JsonRecordError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

/// 仅通过日志输出检测结果
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutput;

impl Render<RgbImage, DetectResult> for LogOutput {
  type Error = std::convert::Infallible;

  fn render_result(&self, _frame: &RgbImage, result: &DetectResult) -> Result<(), Self::Error> {
    info!("检测到 {} 个对象, 状态: {}", result.len(), result.status);
    for item in result.items.iter() {
      let bbox = item.detection.bbox;
      info!(
        "  - {}: {:.2}% at ({}, {}, {}x{})",
        item.label,
        item.detection.score * 100.0,
        bbox.x,
        bbox.y,
        bbox.width,
        bbox.height
      );
    }
    Ok(())
  }
}

pub enum OutputWrapper {
  Log(LogOutput),
  #[cfg(feature = "save_image_file")]
  SaveImageFileOutput(SaveImageFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
  #[cfg(feature = "json_record")]
  JsonRecordOutput(JsonRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      "log" => Ok(OutputWrapper::Log(LogOutput)),
      #[cfg(feature = "save_image_file")]
      SaveImageFileOutput::SCHEME => {
        let output = SaveImageFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveImageFileOutput(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      #[cfg(feature = "json_record")]
      JsonRecordOutput::SCHEME => {
        let output = JsonRecordOutput::from_url(url)?;
        Ok(OutputWrapper::JsonRecordOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<RgbImage, DetectResult> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &RgbImage, result: &DetectResult) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::Log(output) => match output.render_result(frame, result) {
        Ok(()) => Ok(()),
        Err(never) => match never {},
      },
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "json_record")]
      OutputWrapper::JsonRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}
