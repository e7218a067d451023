// 该文件是 Xingshen （醒神） 项目的一部分。
// src/fps.rs - 帧率统计
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

use std::time::Duration;

pub const DEFAULT_FPS_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsReport {
  pub fps: f64,
  pub avg_frame_ms: f64,
}

/// 按固定帧数窗口统计平均帧耗时，由调用方持有
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
  window: usize,
  frames: usize,
  accumulated: Duration,
}

impl Default for FrameRateMeter {
  fn default() -> Self {
    Self::new(DEFAULT_FPS_WINDOW)
  }
}

impl FrameRateMeter {
  pub fn new(window: usize) -> Self {
    Self {
      window: window.max(1),
      frames: 0,
      accumulated: Duration::ZERO,
    }
  }

  /// 记录一帧耗时，窗口满时返回统计结果并清零
  pub fn record(&mut self, frame_time: Duration) -> Option<FpsReport> {
    self.frames += 1;
    self.accumulated += frame_time;
    if self.frames < self.window {
      return None;
    }

    let avg_frame_ms = self.accumulated.as_secs_f64() * 1000.0 / self.frames as f64;
    let fps = if avg_frame_ms > 0.0 {
      1000.0 / avg_frame_ms
    } else {
      0.0
    };
    self.frames = 0;
    self.accumulated = Duration::ZERO;

    Some(FpsReport { fps, avg_frame_ms })
  }
}
