// Audio collaborator contract.
//
// Gameplay fires cues and forgets them. `SoundBank` tracks which named
// sounds have a file on disk and records the cues routed to them; asking
// for one that is missing is a warning (once per name), never an error.
// It decodes nothing and opens no output device.

use std::collections::{HashMap, HashSet};

pub trait AudioSink {
    /// One-shot sound. `pitch_variance` is the +/- random pitch spread.
    fn play(&mut self, name: &str, volume: f32, pitch_variance: f32);
    fn start_loop(&mut self, name: &str, volume: f32);
    fn set_loop_volume(&mut self, name: &str, volume: f32);
    fn set_loop_pitch(&mut self, name: &str, pitch: f32);
}

/// State of one running loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopVoice {
    pub volume: f32,
    pub pitch: f32,
}

/// Registry of loaded sounds plus running loops.
#[derive(Debug, Default)]
pub struct SoundBank {
    loaded: HashSet<String>,
    warned: HashSet<String>,
    loops: HashMap<String, LoopVoice>,
    /// One-shots played since the last `take_played`.
    played: Vec<(String, f32)>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as present, so its cues are routed.
    pub fn register(&mut self, name: &str) {
        self.loaded.insert(name.to_string());
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    pub fn loop_voice(&self, name: &str) -> Option<LoopVoice> {
        self.loops.get(name).copied()
    }

    pub fn take_played(&mut self) -> Vec<(String, f32)> {
        std::mem::take(&mut self.played)
    }

    /// Returns false (after a one-time warning) when `name` is unavailable.
    fn available(&mut self, name: &str) -> bool {
        if self.loaded.contains(name) {
            return true;
        }
        if self.warned.insert(name.to_string()) {
            log::warn!("sound '{name}' not loaded; playing silence");
        }
        false
    }
}

impl AudioSink for SoundBank {
    fn play(&mut self, name: &str, volume: f32, pitch_variance: f32) {
        if self.available(name) {
            log::trace!("play {name} vol={volume:.2} pitch±{pitch_variance:.2}");
            self.played.push((name.to_string(), volume.clamp(0.0, 1.0)));
        }
    }

    fn start_loop(&mut self, name: &str, volume: f32) {
        if self.available(name) {
            self.loops.insert(
                name.to_string(),
                LoopVoice { volume: volume.clamp(0.0, 1.0), pitch: 1.0 },
            );
        }
    }

    fn set_loop_volume(&mut self, name: &str, volume: f32) {
        if let Some(voice) = self.loops.get_mut(name) {
            voice.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn set_loop_pitch(&mut self, name: &str, pitch: f32) {
        if let Some(voice) = self.loops.get_mut(name) {
            voice.pitch = pitch.max(0.01);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sound_is_silent() {
        let mut bank = SoundBank::new();
        bank.play("shoot", 1.0, 0.1);
        bank.play("shoot", 1.0, 0.1);
        assert!(bank.take_played().is_empty());
        assert_eq!(bank.warned.len(), 1);
    }

    #[test]
    fn loops_track_volume_and_pitch() {
        let mut bank = SoundBank::new();
        bank.register("wind");
        bank.start_loop("wind", 0.2);
        bank.set_loop_volume("wind", 2.0);
        bank.set_loop_pitch("wind", 1.4);
        assert_eq!(bank.loop_voice("wind"), Some(LoopVoice { volume: 1.0, pitch: 1.4 }));
        // Adjusting a loop that never started is a no-op.
        bank.set_loop_volume("rain", 0.5);
        assert_eq!(bank.loop_voice("rain"), None);
    }
}
