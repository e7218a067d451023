// 该文件是 Xingshen （醒神） 项目的一部分。
// src/output/directory_record.rs - 按帧保存到目录
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
  path::PathBuf,
  sync::atomic::{AtomicU32, Ordering},
};

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::DetectResult,
  output::{
    Render,
    draw::{Draw, DrawError, draw_from_query},
  },
  url_to_path,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("绘制错误: {0}")]
  DrawError(#[from] DrawError),
}

/// 每帧保存一张 `frame-000001.png`，默认只保存有检测结果的帧，`?always` 保存所有帧
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  draw: Draw,
  frame_counter: AtomicU32,
  always: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(DirectoryRecordOutput {
      directory: url_to_path(uri),
      draw: draw_from_query(uri)?,
      frame_counter: AtomicU32::new(0),
      always,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_path(&self) -> Result<PathBuf, DirectoryRecordOutputError> {
    let id = self.frame_counter.fetch_add(1, Ordering::Relaxed) + 1;
    if !self.directory.exists() {
      std::fs::create_dir_all(&self.directory)?;
    }
    Ok(self.directory.join(format!("frame-{:06}.png", id)))
  }
}

impl Render<RgbImage, DetectResult> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &RgbImage, result: &DetectResult) -> Result<(), Self::Error> {
    let path = self.frame_path()?;
    if self.always || !result.is_empty() {
      let mut image = frame.clone();
      self.draw.draw_result(&mut image, result);
      image.save(&path)?;
      debug!("保存帧: {}", path.display());
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    labels::ClassLabels,
    model::{BoundingBox, Detection},
  };

  fn output_for(dir: &std::path::Path, query: &str) -> DirectoryRecordOutput {
    let url = url::Url::parse(&format!("folder://{}{}", dir.display(), query)).unwrap();
    DirectoryRecordOutput::from_url(&url).unwrap()
  }

  #[test]
  fn only_frames_with_detections_are_saved() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_for(dir.path(), "");
    let labels = ClassLabels::default();
    let frame = RgbImage::new(16, 16);

    let empty = DetectResult::new(Vec::new(), &labels);
    let hit = DetectResult::new(
      vec![Detection {
        bbox: BoundingBox::new(1, 1, 4, 4),
        class_id: 0,
        score: 0.7,
      }],
      &labels,
    );
    output.render_result(&frame, &empty).unwrap();
    output.render_result(&frame, &hit).unwrap();

    assert!(!dir.path().join("frame-000001.png").exists());
    assert!(dir.path().join("frame-000002.png").exists());
  }

  #[test]
  fn directory_with_space_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let run = dir.path().join("my run");
    let output = output_for(&run, "?always");
    let empty = DetectResult::new(Vec::new(), &ClassLabels::default());
    output.render_result(&RgbImage::new(8, 8), &empty).unwrap();
    assert!(run.join("frame-000001.png").exists());
  }

  #[test]
  fn always_saves_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_for(dir.path(), "?always");
    let empty = DetectResult::new(Vec::new(), &ClassLabels::default());
    output.render_result(&RgbImage::new(8, 8), &empty).unwrap();
    assert!(dir.path().join("frame-000001.png").exists());
  }
}
