// 该文件是 Xingshen （醒神） 项目的一部分。
// src/task.rs - 逐帧处理任务
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

use std::time::Instant;

use tracing::{info, warn};

use crate::{
  fps::FrameRateMeter,
  model::{DetectResult, Model},
  output::Render,
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<TaskReport, Self::Error>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskReport {
  /// 成功处理的帧数
  pub frames: usize,
  /// 因单帧错误跳过的帧数
  pub skipped: usize,
  pub detections: usize,
  pub drowsy_frames: usize,
}

#[derive(Default, Debug)]
pub struct ContinuousTask {
  frame_number: Option<usize>,
  meter: FrameRateMeter,
}

impl ContinuousTask {
  /// 处理指定帧数后退出，None 表示直到输入结束
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }

  pub fn with_meter(mut self, meter: FrameRateMeter) -> Self {
    self.meter = meter;
    self
  }
}

impl<
  F,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: Model<Input = F, Output = DetectResult, Error = ME>,
  O: Render<F, DetectResult, Error = RE>,
> Task<I, M, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(mut self, input: I, model: M, output: O) -> Result<TaskReport, Self::Error> {
    info!("开始任务...");
    let mut report = TaskReport::default();

    for (frame_index, frame) in input.enumerate() {
      if self.frame_number.is_some_and(|n| frame_index >= n) {
        info!("达到指定帧数 {}, 退出任务循环", frame_index);
        break;
      }

      let now = Instant::now();
      let result = match model.infer(&frame) {
        Ok(result) => result,
        Err(e) => {
          // 单帧失败不影响后续帧
          warn!("第 {} 帧处理失败, 跳过: {}", frame_index + 1, e);
          report.skipped += 1;
          continue;
        }
      };
      let elapsed_infer = now.elapsed();
      output.render_result(&frame, &result)?;
      let elapsed_frame = now.elapsed();

      report.frames += 1;
      report.detections += result.len();
      if result.status.is_drowsy() {
        report.drowsy_frames += 1;
      }
      info!(
        "第 {} 帧: {} | 推理耗时: {:.2?} / {:.2?}",
        frame_index + 1,
        result.status,
        elapsed_infer,
        elapsed_frame
      );

      if let Some(fps) = self.meter.record(elapsed_frame) {
        info!(
          "FPS: {:.2} | ms/frame: {:.2}",
          fps.fps, fps.avg_frame_ms
        );
      }
    }

    info!(
      "任务完成: 处理 {} 帧, 跳过 {} 帧, 共 {} 个检测",
      report.frames, report.skipped, report.detections
    );
    Ok(report)
  }
}
