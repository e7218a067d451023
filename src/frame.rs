// 该文件是 Xingshen （醒神） 项目的一部分。
// src/frame.rs - NCHW 浮点输入张量
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

const RGB_CHANNELS: usize = 3;

/// 归一化到 [0, 1] 的 RGB 张量，形状 [1, 3, H, W]
#[derive(Debug, Clone)]
pub struct RgbNchwTensor {
  data: Box<[f32]>,
  width: usize,
  height: usize,
}

impl RgbNchwTensor {
  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn shape(&self) -> [usize; 4] {
    [1, RGB_CHANNELS, self.height, self.width]
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }
}

impl From<&RgbImage> for RgbNchwTensor {
  fn from(image: &RgbImage) -> Self {
    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);
    let plane_size = width * height;
    let mut data = vec![0f32; RGB_CHANNELS * plane_size];

    for (idx, pixel) in image.pixels().enumerate() {
      data[idx] = pixel[0] as f32 / 255.0;
      data[plane_size + idx] = pixel[1] as f32 / 255.0;
      data[2 * plane_size + idx] = pixel[2] as f32 / 255.0;
    }

    Self {
      data: data.into_boxed_slice(),
      width,
      height,
    }
  }
}
