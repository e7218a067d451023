// 该文件是 Xingshen （醒神） 项目的一部分。
// src/labels.rs - 类别名称表
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

use std::{borrow::Cow, path::Path};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LabelsError {
  #[error("读取类别文件 {path} 失败: {source}")]
  IoError {
    path: String,
    source: std::io::Error,
  },
}

/// 按类别编号索引的类别名称
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassLabels {
  names: Vec<String>,
}

impl ClassLabels {
  pub fn new(names: Vec<String>) -> Self {
    Self { names }
  }

  /// 每行一个类别名，跳过空行
  pub fn parse(text: &str) -> Self {
    let names = text
      .lines()
      .map(|line| line.trim_end_matches('\r'))
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect();
    Self { names }
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LabelsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LabelsError::IoError {
      path: path.display().to_string(),
      source,
    })?;
    let labels = Self::parse(&text);
    info!("从 {} 加载 {} 个类别", path.display(), labels.len());
    Ok(labels)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn get(&self, class_id: usize) -> Option<&str> {
    self.names.get(class_id).map(String::as_str)
  }

  /// 越界时返回 `cls_<id>`
  pub fn label(&self, class_id: usize) -> Cow<'_, str> {
    match self.get(class_id) {
      Some(name) => Cow::Borrowed(name),
      None => Cow::Owned(format!("cls_{}", class_id)),
    }
  }
}
