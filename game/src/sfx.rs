//! Sound catalog and the event → cue mapping.
//!
//! The simulation emits `SkateEvent`s; this module turns them into abstract
//! playback cues. Actual mixing lives in the headful binary, so tests can
//! assert on cues without an audio device.

use crate::catch::CatchResolution;
use crate::detector::{DetectorEvent, Side};
use crate::flight::FlightEvent;
use crate::rng::Rng;
use crate::state::SkateEvent;

/// Shared SFX volume constants (0.0..=1.0).
pub const FOOT_SFX_VOLUME: f32 = 0.3;
pub const POP_SFX_VOLUME: f32 = 0.8;
pub const CATCH_SFX_VOLUME: f32 = 0.6;
pub const LAND_SFX_VOLUME: f32 = 0.7;
pub const LOOP_SFX_VOLUME: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Pop(u8),
    CatchAmbient(u8),
    Land(u8),
    Success,
    Fail,
    Death,
    CancelTrick,
    Foot1,
    Foot2,
    WheelsRolling,
    Rail,
}

impl SoundId {
    pub const POP_VARIANTS: u8 = 5;
    pub const CATCH_AMBIENT_VARIANTS: u8 = 3;
    pub const LAND_VARIANTS: u8 = 4;

    /// File stem under the SFX asset directory (extension varies per file).
    pub fn file_name(self) -> String {
        match self {
            SoundId::Pop(i) => format!("Pop_{}.wav", i + 1),
            SoundId::CatchAmbient(i) => format!("Catch_{}.mp3", i + 1),
            SoundId::Land(i) => format!("Land_{}.wav", i + 1),
            SoundId::Success => "Success.mp3".to_string(),
            SoundId::Fail => "Fail.mp3".to_string(),
            SoundId::Death => "Death.mp3".to_string(),
            SoundId::CancelTrick => "CancelTrick.wav".to_string(),
            SoundId::Foot1 => "Foot1.wav".to_string(),
            SoundId::Foot2 => "Foot2.wav".to_string(),
            SoundId::WheelsRolling => "WheelsRolling.wav".to_string(),
            SoundId::Rail => "Rail.wav".to_string(),
        }
    }

    pub fn volume(self) -> f32 {
        match self {
            SoundId::Foot1 | SoundId::Foot2 => FOOT_SFX_VOLUME,
            SoundId::Pop(_) => POP_SFX_VOLUME,
            SoundId::CatchAmbient(_) | SoundId::CancelTrick => CATCH_SFX_VOLUME,
            SoundId::Land(_) | SoundId::Success | SoundId::Fail | SoundId::Death => {
                LAND_SFX_VOLUME
            }
            SoundId::WheelsRolling | SoundId::Rail => LOOP_SFX_VOLUME,
        }
    }
}

/// Named looping channels; each plays at most one sound at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopChannel {
    Wheels,
    Rail,
}

/// Speed factor for the pitched-up catch confirmation.
pub const CATCH_PITCH_SPEED: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    Play(SoundId),
    /// Play resampled at the given speed factor (raises pitch).
    PlayPitched(SoundId, f32),
    PlayLooping(LoopChannel, SoundId),
    Stop(LoopChannel),
}

/// Maps one simulation event to its playback cues. Random variants come
/// from the caller's RNG so the simulation itself stays untouched.
pub fn cues_for(event: SkateEvent, rng: &mut Rng) -> Vec<SoundCue> {
    match event {
        SkateEvent::Input(input) => match input {
            DetectorEvent::FootMoved(Side::Left) => vec![SoundCue::Play(SoundId::Foot1)],
            DetectorEvent::FootMoved(Side::Right) => vec![SoundCue::Play(SoundId::Foot2)],
            DetectorEvent::AttemptCancelled { .. } => {
                vec![SoundCue::Play(SoundId::CancelTrick)]
            }
            DetectorEvent::AttemptStarted(_)
            | DetectorEvent::TrickConfirmed(_)
            | DetectorEvent::InvalidCombination(_) => Vec::new(),
        },
        SkateEvent::Flight(flight) => match flight {
            FlightEvent::TrickStarted(_) => vec![
                SoundCue::Play(SoundId::Pop(rng.index(SoundId::POP_VARIANTS as usize) as u8)),
                SoundCue::Play(SoundId::CatchAmbient(
                    rng.index(SoundId::CATCH_AMBIENT_VARIANTS as usize) as u8,
                )),
                SoundCue::PlayLooping(LoopChannel::Wheels, SoundId::WheelsRolling),
            ],
            FlightEvent::CatchResolved { resolution, .. } => match resolution {
                CatchResolution::Caught => vec![SoundCue::PlayPitched(
                    SoundId::CatchAmbient(
                        rng.index(SoundId::CATCH_AMBIENT_VARIANTS as usize) as u8,
                    ),
                    CATCH_PITCH_SPEED,
                )],
                CatchResolution::MissedAttempt | CatchResolution::WindowExpired => {
                    vec![SoundCue::Play(SoundId::Death)]
                }
            },
            FlightEvent::GrindWindowOpened => Vec::new(),
            FlightEvent::GrindStarted(_) => {
                vec![SoundCue::PlayLooping(LoopChannel::Rail, SoundId::Rail)]
            }
            FlightEvent::GrindEnded { .. } => vec![SoundCue::Stop(LoopChannel::Rail)],
            FlightEvent::Landed { caught, from_grind } => {
                let mut cues = vec![SoundCue::Stop(LoopChannel::Wheels)];
                if from_grind {
                    // The success chime already played at the catch; grind
                    // exits only get the landing thump.
                    cues.push(SoundCue::Play(SoundId::Land(
                        rng.index(SoundId::LAND_VARIANTS as usize) as u8,
                    )));
                } else if caught {
                    cues.push(SoundCue::Play(SoundId::Land(
                        rng.index(SoundId::LAND_VARIANTS as usize) as u8,
                    )));
                    cues.push(SoundCue::Play(SoundId::Success));
                } else {
                    cues.push(SoundCue::Play(SoundId::Fail));
                }
                cues
            }
        },
    }
}
