// 该文件是 Xingshen （醒神） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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
  collections::VecDeque,
  path::{Path, PathBuf},
};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, url_to_path};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
  #[error("No image found in {0}")]
  NoImage(String),
}

/// 单张图片，或目录中按文件名排序的图片序列
pub struct ImageFileInput {
  first: Option<RgbImage>,
  pending: VecDeque<PathBuf>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    Self::open(url_to_path(url))
  }
}

impl ImageFileInput {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageFileInputError> {
    let path = path.as_ref();
    let mut pending: VecDeque<PathBuf> = if path.is_dir() {
      let mut files = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_image_file(p))
        .collect::<Vec<_>>();
      files.sort();
      files.into()
    } else {
      VecDeque::from([path.to_path_buf()])
    };

    // 第一张图片立即解码，尽早暴露路径错误
    let first_path = pending
      .pop_front()
      .ok_or_else(|| ImageFileInputError::NoImage(path.display().to_string()))?;
    let first = load_image(&first_path)?;
    info!(
      "输入图像: {} ({}x{}), 后续 {} 张",
      first_path.display(),
      first.width(),
      first.height(),
      pending.len()
    );

    Ok(Self {
      first: Some(first),
      pending,
    })
  }
}

impl Iterator for ImageFileInput {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(image) = self.first.take() {
      return Some(image);
    }
    while let Some(path) = self.pending.pop_front() {
      match load_image(&path) {
        Ok(image) => return Some(image),
        Err(e) => error!("读取图像 {} 失败, 跳过: {}", path.display(), e),
      }
    }
    None
  }
}

fn is_image_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| {
      IMAGE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
    })
    .unwrap_or(false)
}

fn load_image(path: &Path) -> Result<RgbImage, ImageFileInputError> {
  let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
  Ok(image.into_rgb8())
}
