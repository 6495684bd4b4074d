//! What flows in and out of the core each frame: the sampled input and
//! the audio cues raised while updating.

/// Held keys for one frame. Device polling is the caller's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        FrameInput::default()
    }
}

/// Named sound cues; playback is up to whoever implements `CueSink`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Shoot,
    Hit,
    LifeGain,
    LifeLost,
    Death,
    PowerUp,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Hit => "hit",
            Cue::LifeGain => "life-gain",
            Cue::LifeLost => "life-lost",
            Cue::Death => "death",
            Cue::PowerUp => "power-up",
        }
    }
}

/// Audio collaborator.
pub trait CueSink {
    fn play(&mut self, cue: Cue);

    fn play_all(&mut self, cues: &[Cue]) {
        for &cue in cues {
            self.play(cue);
        }
    }
}

/// Collects cues; handy for tests and replays.
impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}
