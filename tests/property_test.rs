//! Property-based tests over the whole rack.

use guitarfx::audio::{EffectChain, EffectSpec, Engine, Looper};
use guitarfx::audio_api::{Ack, AudioCommand, LooperCommand};
use guitarfx::Effect;
use proptest::prelude::*;

fn all_finite(buffer: &[f32]) -> bool {
    buffer.iter().all(|s| s.is_finite())
}

fn rack_effect(index: usize, sample_rate: f32) -> Box<dyn Effect> {
    EffectSpec::default_rack()[index].build(sample_rate)
}

proptest! {
    /// Property: no effect in the rack produces NaN or Inf for bounded input
    #[test]
    fn rack_output_is_finite(
        index in 0usize..11,
        sample_rate in prop::sample::select(vec![22050.0f32, 44100.0, 48000.0, 96000.0]),
        samples in prop::collection::vec(-1.0f32..1.0, 0..2048)
    ) {
        let mut fx = rack_effect(index, sample_rate);
        let mut buffer = samples;
        for chunk in buffer.chunks_mut(128) {
            fx.process(chunk);
        }
        prop_assert!(all_finite(&buffer), "{} produced NaN or Inf", fx.name());
    }

    /// Property: after reset, silence in means silence out
    #[test]
    fn reset_then_silence_is_silent(
        index in 0usize..11,
        noise in prop::collection::vec(-1.0f32..1.0, 1..1024),
        len in 0usize..1024
    ) {
        let mut fx = rack_effect(index, 48000.0);
        let mut dirty = noise;
        fx.process(&mut dirty);
        fx.reset();

        let mut silence = vec![0.0f32; len];
        fx.process(&mut silence);
        prop_assert!(silence.iter().all(|s| *s == 0.0), "{} leaked state through reset", fx.name());
    }

    /// Property: an empty block comes back empty and changes nothing
    #[test]
    fn empty_block_is_a_no_op(index in 0usize..11) {
        let mut touched = rack_effect(index, 48000.0);
        let mut fresh = rack_effect(index, 48000.0);
        touched.process(&mut []);

        let mut a = vec![0.5f32; 64];
        let mut b = a.clone();
        touched.process(&mut a);
        fresh.process(&mut b);
        prop_assert_eq!(a, b);
    }

    /// Property: toggling the same slots twice restores every flag
    #[test]
    fn chain_toggle_is_an_involution(toggles in prop::collection::vec(0usize..16, 0..32)) {
        let mut chain = EffectChain::from_specs(&EffectSpec::default_rack(), 48000.0);
        chain.toggle_effect(2);
        let before = chain.enabled_mask();

        for &i in &toggles {
            chain.toggle_effect(i);
        }
        for &i in toggles.iter().rev() {
            chain.toggle_effect(i);
        }
        prop_assert_eq!(chain.enabled_mask(), before);
    }

    /// Property: the loop is exactly as long as what was recorded
    #[test]
    fn loop_length_matches_take(n in 1usize..4000) {
        let mut looper = Looper::new(1000.0, 4.0);
        looper.start_recording();
        let mut take = vec![0.25f32; n];
        looper.process(&mut take);
        prop_assert_eq!(looper.stop_recording(), Ok(n));

        // one full lap puts the play cursor back at 0
        let mut lap = vec![0.0f32; n];
        looper.process(&mut lap);
        prop_assert_eq!(looper.play_position(), 0);
    }

    /// Property: whatever the command sequence, the engine keeps rendering
    #[test]
    fn any_command_sequence_keeps_audio_finite(
        cmds in prop::collection::vec(0u8..9, 0..40),
        arg in 0usize..14
    ) {
        let mut engine = Engine::new(&EffectSpec::default_rack(), 8000.0, 0.5);
        let mut block = [0.3f32; 64];
        for c in cmds {
            let cmd = match c {
                0 => AudioCommand::SelectEffect(arg),
                1 => AudioCommand::SetChainMode(true),
                2 => AudioCommand::SetChainMode(false),
                3 => AudioCommand::ToggleChainEffect(arg),
                4 => AudioCommand::ResetChain,
                5 => AudioCommand::Looper(LooperCommand::StartRecording),
                6 => AudioCommand::Looper(LooperCommand::StopOrToggle),
                7 => AudioCommand::Looper(LooperCommand::TogglePlayback),
                _ => AudioCommand::Looper(LooperCommand::Clear),
            };
            if let Ok(Ack::EffectSelected(name)) = engine.handle_cmd(cmd) {
                prop_assert_eq!(name, EffectSpec::default_rack()[arg].label());
            }
            block.fill(0.3);
            engine.render_block(&mut block);
            prop_assert!(all_finite(&block));
        }
    }
}
