// 该文件是 Xingshen （醒神） 项目的一部分。
// src/lib.rs - 库主文件
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

pub mod config;
pub mod error;
pub mod fps;
pub mod frame;
pub mod input;
pub mod labels;
pub mod letterbox;
pub mod model;
pub mod output;
pub mod status;
pub mod task;

pub use self::error::VisionError;
pub use self::letterbox::{LetterboxInfo, letterbox};
pub use self::model::decode::decode;

/// 百分号解码后的 URL 路径，路径中可以含有空格或非 ASCII 字符
pub fn url_to_path(url: &url::Url) -> std::path::PathBuf {
  let decoded = urlencoding::decode_binary(url.path().as_bytes());
  std::path::PathBuf::from(String::from_utf8_lossy(&decoded).into_owned())
}

pub trait FromUrl {
  type Error;
  fn from_url(url: &url::Url) -> Result<Self, Self::Error>
  where
    Self: Sized;
}

pub trait FromUrlWithScheme: FromUrl {
  const SCHEME: &'static str;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_path_is_percent_decoded() {
    let url = url::Url::parse("tensor:///tmp/my run/输出.json").unwrap();
    assert_eq!(url.path(), "/tmp/my%20run/%E8%BE%93%E5%87%BA.json");
    assert_eq!(
      url_to_path(&url),
      std::path::PathBuf::from("/tmp/my run/输出.json")
    );
  }
}
