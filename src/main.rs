// 该文件是 Xingshen （醒神） 项目的一部分。
// src/main.rs - 疲劳检测主程序
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

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use url::Url;

use xingshen::{
  FromUrl,
  config::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_INPUT_SIZE, DEFAULT_NMS_THRESHOLD, DetectorConfig,
    NmsMode,
  },
  fps::{DEFAULT_FPS_WINDOW, FrameRateMeter},
  input::InputWrapper,
  labels::ClassLabels,
  model::{TensorReplayBackend, YoloDetector},
  output::OutputWrapper,
  task::{ContinuousTask, Task},
};

/// Xingshen 疲劳检测
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源，例如 image:///data/frames
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 录制的模型输出，例如 tensor:///data/output.json
  #[arg(long, value_name = "TENSOR")]
  pub tensor: Url,
  /// 输出路径 (image:// folder:// json:// log://)，缺省时只打印日志
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<Url>,
  /// 类别名称文件，每行一个
  #[arg(long, value_name = "FILE")]
  pub labels: Option<PathBuf>,
  /// 置信度阈值
  #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD, value_name = "THRESHOLD")]
  pub confidence: f32,
  /// NMS IoU 阈值
  #[arg(long, default_value_t = DEFAULT_NMS_THRESHOLD, value_name = "THRESHOLD")]
  pub nms_threshold: f32,
  /// 模型输入边长
  #[arg(long, default_value_t = DEFAULT_INPUT_SIZE, value_name = "PIXELS")]
  pub input_size: u32,
  /// letterbox 填充灰度值
  #[arg(long, default_value_t = 114, value_name = "VALUE")]
  pub pad_value: u8,
  /// 按类别分别做 NMS
  #[arg(long)]
  pub class_aware_nms: bool,
  /// 处理的最大帧数
  #[arg(long, value_name = "COUNT")]
  pub frame_number: Option<usize>,
  /// 帧率统计窗口
  #[arg(long, default_value_t = DEFAULT_FPS_WINDOW, value_name = "FRAMES")]
  pub fps_window: usize,
}

fn load_labels(path: Option<&PathBuf>) -> ClassLabels {
  let Some(path) = path else {
    return ClassLabels::default();
  };
  match ClassLabels::from_file(path) {
    Ok(labels) => {
      info!("加载 {} 个类别名称", labels.len());
      labels
    }
    Err(e) => {
      // 缺少类别文件时仍可运行，标签退化为 cls_<id>
      warn!("{}, 使用默认类别名称", e);
      ClassLabels::default()
    }
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("模型输出: {}", args.tensor);
  match &args.output {
    Some(output) => info!("输出路径: {}", output),
    None => info!("未指定输出, 仅记录日志"),
  }

  let nms_mode = if args.class_aware_nms {
    NmsMode::PerClass
  } else {
    NmsMode::ClassAgnostic
  };
  let config = DetectorConfig::default()
    .with_input_size(args.input_size, args.input_size)
    .with_confidence_threshold(args.confidence)
    .with_nms_threshold(args.nms_threshold)
    .with_pad_color([args.pad_value; 3])
    .with_nms_mode(nms_mode);
  info!("检测参数: {:?}", config);

  let labels = load_labels(args.labels.as_ref());
  let input = InputWrapper::from_url(&args.input).context("打开输入失败")?;
  let backend = TensorReplayBackend::from_url(&args.tensor).context("加载模型输出失败")?;
  let model = YoloDetector::new(backend, config).with_labels(labels);
  let output = match &args.output {
    Some(url) => OutputWrapper::from_url(url).context("创建输出失败")?,
    None => OutputWrapper::Log(Default::default()),
  };

  let report = ContinuousTask::default()
    .with_frame_number(args.frame_number)
    .with_meter(FrameRateMeter::new(args.fps_window))
    .run_task(input, model, output)?;

  info!(
    "共 {} 帧, 其中 {} 帧判定为疲劳",
    report.frames, report.drowsy_frames
  );

  Ok(())
}
