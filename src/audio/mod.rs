use std::sync::Arc;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::{AudioCommand, CommandOutcome};
use crate::config::Config;

pub mod biquad;
mod chain;
pub mod delay_line;
mod effect;
mod engine;
mod error;
pub mod fx;
mod looper;
mod status;

pub use chain::EffectChain;
pub use effect::{
    Clean, Distortion, DistortionParams, Effect, EffectSpec, GainBoost, GainParams, LowPassFilter,
    LowPassParams,
};
pub use engine::Engine;
pub use error::CommandError;
pub use looper::{Looper, LooperMode, LooperStatus};
pub use status::{SharedStatus, StatusSnapshot};

const COMMAND_QUEUE: usize = 1024;
const OUTCOME_QUEUE: usize = 64;
const INPUT_BLOCKS_BUFFERED: usize = 16;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    outcome_rx: Receiver<CommandOutcome>,
    status: Arc<SharedStatus>,
    _output_stream: cpal::Stream,
    _input_stream: Option<cpal::Stream>, // None when no input device
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        if self.tx.try_send(cmd).is_err() {
            tracing::warn!(?cmd, "command queue full, dropped");
        }
    }

    pub fn poll_outcome(&self) -> Option<CommandOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    pub fn status(&self) -> &SharedStatus {
        &self.status
    }
}

/// Open the devices and move `engine` into the output callback.
pub fn start_audio(cfg: &Config, engine: Engine) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_QUEUE);
    let (outcome_tx, outcome_rx) = crossbeam_channel::bounded::<CommandOutcome>(OUTCOME_QUEUE);
    let (input_tx, input_rx) =
        crossbeam_channel::bounded::<f32>(cfg.block_size * INPUT_BLOCKS_BUFFERED);

    let host = cpal::default_host();
    let device = match cfg.output_device {
        Some(i) => host
            .output_devices()
            .context("could not list output devices")?
            .nth(i)
            .with_context(|| format!("no output device at index {i}"))?,
        None => host.default_output_device().context("no default output device")?,
    };
    let supported = device.default_output_config().context("no default output config")?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        anyhow::bail!("unsupported sample format (only f32 supported for now)");
    }

    let mut config: cpal::StreamConfig = supported.into();
    config.sample_rate = cfg.sample_rate;
    tracing::info!(
        sample_rate = cfg.sample_rate,
        block_size = cfg.block_size,
        channels = config.channels,
        "opening output stream"
    );

    let status = Arc::new(SharedStatus::new(engine.sample_rate()));
    let links = OutputLinks {
        rx,
        input_rx,
        outcome_tx,
        status: Arc::clone(&status),
    };
    let output_stream = build_output_stream(&device, &config, engine, links, cfg.block_size)?;
    output_stream.play().context("failed to play output stream")?;

    let input_stream = try_build_input_stream(&host, cfg, input_tx);

    Ok(AudioHandle {
        tx,
        outcome_rx,
        status,
        _output_stream: output_stream,
        _input_stream: input_stream,
    })
}

// ── Output stream ─────────────────────────────────────────────────

struct OutputLinks {
    rx: Receiver<AudioCommand>,
    input_rx: Receiver<f32>,
    outcome_tx: Sender<CommandOutcome>,
    status: Arc<SharedStatus>,
}

/// Re-blocks whatever callback size the device picks into the engine's
/// fixed block size. Commands land only when a new block starts.
struct BlockRunner {
    engine: Engine,
    links: OutputLinks,
    block: Vec<f32>,
    cursor: usize, // next sample of `block` to hand out
}

impl BlockRunner {
    fn new(engine: Engine, links: OutputLinks, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            engine,
            links,
            block: vec![0.0; block_size],
            cursor: block_size,
        }
    }

    fn next_block(&mut self) {
        while let Ok(cmd) = self.links.rx.try_recv() {
            let outcome = self.engine.handle_cmd(cmd);
            let _ = self.links.outcome_tx.try_send(outcome); // dropped if nobody reads
        }

        // mic samples, silence on underrun
        for s in self.block.iter_mut() {
            *s = self.links.input_rx.try_recv().unwrap_or(0.0);
        }

        self.engine.render_block(&mut self.block);
        self.engine.publish(&self.links.status);
        self.cursor = 0;
    }

    fn fill(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels) {
            if self.cursor == self.block.len() {
                self.next_block();
            }
            frame.fill(self.block[self.cursor]); // mono out on every channel
            self.cursor += 1;
        }
    }
}

fn build_output_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    engine: Engine,
    links: OutputLinks,
    block_size: usize,
) -> anyhow::Result<cpal::Stream> {
    let channels = (config.channels as usize).max(1);
    let mut runner = BlockRunner::new(engine, links, block_size);

    let err_fn = |err| tracing::warn!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| runner.fill(data, channels),
        err_fn,
        None,
    )?;

    Ok(stream)
}

// ── Input stream ──────────────────────────────────────────────────

fn try_build_input_stream(
    host: &cpal::Host,
    cfg: &Config,
    tx: Sender<f32>,
) -> Option<cpal::Stream> {
    let device = match cfg.input_device {
        Some(i) => host.input_devices().ok()?.nth(i),
        None => host.default_input_device(),
    };
    let Some(device) = device else {
        tracing::warn!("no input device, running on silence");
        return None;
    };

    let supported = device.default_input_config().ok()?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        tracing::warn!("input device is not f32, running on silence");
        return None;
    }
    let mut stream_config: cpal::StreamConfig = supported.into();
    stream_config.sample_rate = cfg.sample_rate;

    let in_channels = (stream_config.channels as usize).max(1);

    let err_fn = |err| tracing::warn!("audio input stream error: {err}");

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                // first channel only; the engine is mono
                for frame in data.chunks(in_channels) {
                    let _ = tx.try_send(frame[0]);
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| tracing::warn!("could not open input stream: {e}"))
        .ok()?;

    if let Err(e) = stream.play() {
        tracing::warn!("could not start input stream: {e}");
        return None;
    }

    tracing::info!(channels = in_channels, "input stream running");
    Some(stream)
}
