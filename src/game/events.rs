// Gameplay events and their audio cues.

use glam::Vec2;

use crate::engine::audio::AudioSink;
use crate::engine::components::Team;

/// Name of the ambient wind loop.
pub const WIND_LOOP: &str = "wind";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fire bolt left `team`'s character (not warriors).
    Shot { team: Team, at: Vec2 },
    Landed { team: Team },
    UnitHit { team: Team, at: Vec2 },
    UnitKilled { team: Team, at: Vec2, warrior: bool },
    /// A flying character took a hit. `local` is the player at the keyboard.
    PlayerHit { team: Team, local: bool },
    Respawned { team: Team },
    UnitSpawned { team: Team, warrior: bool },
}

impl GameEvent {
    /// Sample name, volume and pitch variance for this event, if it has one.
    pub fn cue(&self) -> Option<(&'static str, f32, f32)> {
        match *self {
            GameEvent::Shot { team, .. } => Some(("shoot", if team == Team::Green { 0.6 } else { 0.4 }, 0.15)),
            GameEvent::Landed { .. } => Some(("land", 0.35, 0.1)),
            GameEvent::UnitHit { .. } => Some(("hit", 0.5, 0.2)),
            GameEvent::UnitKilled { .. } => Some(("death", 0.6, 0.1)),
            GameEvent::PlayerHit { local, .. } => Some(("hurt", if local { 0.8 } else { 0.5 }, 0.05)),
            GameEvent::Respawned { .. } => Some(("respawn", 0.6, 0.0)),
            GameEvent::UnitSpawned { .. } => None,
        }
    }
}

/// Fire one-shot cues for a frame's events.
pub fn route_events<'a>(events: impl IntoIterator<Item = &'a GameEvent>, audio: &mut impl AudioSink) {
    for event in events {
        if let Some((name, volume, pitch_variance)) = event.cue() {
            audio.play(name, volume, pitch_variance);
        }
    }
}

/// Wind follows the local player's speed: louder and higher when fast.
pub fn update_wind(audio: &mut impl AudioSink, speed: f32) {
    let t = (speed / 800.0).clamp(0.0, 1.0);
    audio.set_loop_volume(WIND_LOOP, 0.1 + 0.5 * t);
    audio.set_loop_pitch(WIND_LOOP, 0.8 + 0.6 * t);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<String>,
        volume: Option<f32>,
        pitch: Option<f32>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, name: &str, _volume: f32, _pitch_variance: f32) {
            self.played.push(name.to_string());
        }
        fn start_loop(&mut self, _name: &str, _volume: f32) {}
        fn set_loop_volume(&mut self, _name: &str, volume: f32) {
            self.volume = Some(volume);
        }
        fn set_loop_pitch(&mut self, _name: &str, pitch: f32) {
            self.pitch = Some(pitch);
        }
    }

    #[test]
    fn events_map_to_cues_in_order() {
        let events = [
            GameEvent::Shot { team: Team::Green, at: Vec2::ZERO },
            GameEvent::UnitSpawned { team: Team::Blue, warrior: true },
            GameEvent::UnitHit { team: Team::Blue, at: Vec2::ZERO },
            GameEvent::Landed { team: Team::Green },
        ];
        let mut sink = Recorder::default();
        route_events(&events, &mut sink);
        assert_eq!(sink.played, vec!["shoot", "hit", "land"]);
    }

    #[test]
    fn wind_is_bounded() {
        let mut sink = Recorder::default();
        update_wind(&mut sink, 0.0);
        assert_eq!(sink.volume, Some(0.1));
        update_wind(&mut sink, 10_000.0);
        assert!((sink.volume.unwrap() - 0.6).abs() < 1e-6);
        assert!((sink.pitch.unwrap() - 1.4).abs() < 1e-6);
    }
}
