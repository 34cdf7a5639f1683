//! Audio: the `AudioSink` end of the gameplay code.
//!
//! Gameplay systems write `SoundRequest` messages (headless-safe). Playback is
//! render-only: `playback_plugin` loads whichever clips exist under `assets/`
//! and plays one-shots; a cue without a clip is skipped.

use std::path::Path;

use bevy::asset::LoadState;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::sim::ports::{AudioSink, SoundCue};

const ASSET_ROOT: &str = "assets";

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundRequest {
    pub cue: SoundCue,
}

impl AudioSink for MessageWriter<'_, SoundRequest> {
    fn play_one_shot(&mut self, cue: SoundCue) {
        self.write(SoundRequest { cue });
    }
}

#[derive(Resource, Debug, Default)]
pub struct SoundBank {
    clips: HashMap<SoundCue, Handle<AudioSource>>,
}

impl SoundBank {
    pub fn get(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        self.clips.get(&cue)
    }
}

/// Gameplay half: message storage only.
pub fn plugin(app: &mut App) {
    app.add_message::<SoundRequest>();
}

/// Render half: needs `AssetServer` and the audio backend.
pub fn playback_plugin(app: &mut App) {
    app.init_resource::<SoundBank>()
        .add_systems(Startup, load_sound_bank)
        .add_systems(Update, play_sound_requests);
}

fn load_sound_bank(asset_server: Res<AssetServer>, mut bank: ResMut<SoundBank>) {
    for cue in SoundCue::ALL {
        let path = cue.asset_path();
        if Path::new(ASSET_ROOT).join(path).exists() {
            bank.clips.insert(cue, asset_server.load(path));
        } else {
            debug!(?cue, path, "no clip for sound cue");
        }
    }
}

fn play_sound_requests(
    mut commands: Commands,
    mut requests: MessageReader<SoundRequest>,
    bank: Res<SoundBank>,
    asset_server: Res<AssetServer>,
) {
    for req in requests.read() {
        let Some(handle) = bank.get(req.cue) else {
            continue;
        };
        if matches!(asset_server.get_load_state(handle.id()), Some(LoadState::Failed(_))) {
            continue;
        }
        commands.spawn((AudioPlayer::new(handle.clone()), PlaybackSettings::DESPAWN));
    }
}
