//! Bridges the controller's synchronous observer channels to Bevy messages.
//!
//! Listeners run inside `PlayerController` calls, where no `World` access is
//! available, so they only push into a shared outbox. `relay_player_events`
//! drains it once per frame. The listeners live inside the controller and are
//! dropped with the player entity.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;

use crate::sim::controller::PlayerController;
use crate::sim::death::DeathCause;
use crate::sim::gauge::GaugeReading;

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    HealthChanged(GaugeReading),
    BreathChanged(GaugeReading),
    BreathDepleted,
    BreathRecovered,
    Died(DeathCause),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerEventOutbox(Arc<Mutex<Vec<PlayerEvent>>>);

impl PlayerEventOutbox {
    fn lock(&self) -> MutexGuard<'_, Vec<PlayerEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, event: PlayerEvent) {
        self.lock().push(event);
    }

    pub fn drain(&self) -> Vec<PlayerEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Subscribes relay listeners on every channel and queues the current
    /// gauge readings so consumers start from the fresh values.
    pub fn attach(&self, controller: &mut PlayerController) {
        let out = self.clone();
        controller.on_health_changed(move |r| out.push(PlayerEvent::HealthChanged(*r)));
        let out = self.clone();
        controller.on_breath_changed(move |r| out.push(PlayerEvent::BreathChanged(*r)));
        let out = self.clone();
        controller.on_breath_depleted(move |_| out.push(PlayerEvent::BreathDepleted));
        let out = self.clone();
        controller.on_breath_recovered(move |_| out.push(PlayerEvent::BreathRecovered));
        let out = self.clone();
        controller.on_death(move |d| out.push(PlayerEvent::Died(d.cause)));

        self.push(PlayerEvent::HealthChanged(controller.health()));
        self.push(PlayerEvent::BreathChanged(controller.breath()));
    }
}

pub fn relay_player_events(outbox: Res<PlayerEventOutbox>, mut writer: MessageWriter<PlayerEvent>) {
    let events = outbox.drain();
    if !events.is_empty() {
        trace!(count = events.len(), "relaying player events");
    }
    writer.write_batch(events);
}
