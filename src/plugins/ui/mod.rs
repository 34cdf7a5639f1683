//! HUD (render-only): health bar, breath bar and the death banner.
//!
//! `HudState` is folded from `PlayerEvent`s plus the player's sprint
//! capability; `draw_hud` only copies it onto the widgets, so the folding is
//! testable without a renderer.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerEvent};
use crate::sim::controller::PlayerController;
use crate::sim::death::DeathCause;

const BAR_WIDTH: f32 = 220.0;
const BAR_HEIGHT: f32 = 14.0;

const HEALTH_COLOR: Color = Color::srgb(0.85, 0.2, 0.25);
const BREATH_COLOR: Color = Color::srgb(0.35, 0.75, 0.95);
const BREATH_LOCKED_COLOR: Color = Color::srgb(0.45, 0.45, 0.5);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HudState {
    pub health: f32,
    pub breath: f32,
    /// Sprint capability is revoked; mirrors `PlayerController::can_sprint`.
    pub sprint_locked: bool,
    pub death: Option<DeathCause>,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            health: 1.0,
            breath: 1.0,
            sprint_locked: false,
            death: None,
        }
    }
}

impl HudState {
    pub fn apply(&mut self, event: &PlayerEvent) {
        match *event {
            PlayerEvent::HealthChanged(r) => self.health = r.percentage(),
            PlayerEvent::BreathChanged(r) => self.breath = r.percentage(),
            PlayerEvent::BreathDepleted | PlayerEvent::BreathRecovered => {}
            PlayerEvent::Died(cause) => self.death = Some(cause),
        }
    }
}

fn banner_text(cause: DeathCause) -> &'static str {
    match cause {
        DeathCause::Fell => "You fell",
        DeathCause::HealthDepleted => "You died",
    }
}

#[derive(Component)]
struct HealthFill;

#[derive(Component)]
struct BreathFill;

#[derive(Component)]
struct DeathBanner;

pub fn plugin(app: &mut App) {
    app.init_resource::<HudState>()
        .add_systems(OnEnter(GameState::InGame), (reset_hud, spawn_hud))
        .add_systems(
            Update,
            (fold_player_events, track_sprint_lockout, draw_hud)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn reset_hud(mut hud: ResMut<HudState>) {
    *hud = HudState::default();
}

fn bar_frame() -> impl Bundle {
    (
        Node {
            width: Val::Px(BAR_WIDTH),
            height: Val::Px(BAR_HEIGHT),
            margin: UiRect::bottom(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
    )
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Hud"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(16.0),
                top: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|root| {
            root.spawn(bar_frame()).with_children(|b| {
                b.spawn((HealthFill, fill_node(), BackgroundColor(HEALTH_COLOR)));
            });
            root.spawn(bar_frame()).with_children(|b| {
                b.spawn((BreathFill, fill_node(), BackgroundColor(BREATH_COLOR)));
            });
        });

    commands.spawn((
        Name::new("DeathBanner"),
        DeathBanner,
        Text::new(""),
        TextFont::from_font_size(48.0),
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(40.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Visibility::Hidden,
        DespawnOnExit(GameState::InGame),
    ));
}

fn fill_node() -> Node {
    Node {
        position_type: PositionType::Absolute,
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        ..default()
    }
}

fn fold_player_events(mut events: MessageReader<PlayerEvent>, mut hud: ResMut<HudState>) {
    for event in events.read() {
        hud.apply(event);
    }
}

fn track_sprint_lockout(q: Query<&PlayerController, With<Player>>, mut hud: ResMut<HudState>) {
    let Ok(controller) = q.single() else {
        return;
    };
    let locked = !controller.can_sprint();
    if hud.sprint_locked != locked {
        hud.sprint_locked = locked;
    }
}

fn draw_hud(
    hud: Res<HudState>,
    mut q_health: Query<&mut Node, (With<HealthFill>, Without<BreathFill>)>,
    mut q_breath: Query<(&mut Node, &mut BackgroundColor), (With<BreathFill>, Without<HealthFill>)>,
    mut q_banner: Query<(&mut Text, &mut Visibility), With<DeathBanner>>,
) {
    if !hud.is_changed() {
        return;
    }

    for mut node in &mut q_health {
        node.width = Val::Percent(hud.health * 100.0);
    }
    for (mut node, mut color) in &mut q_breath {
        node.width = Val::Percent(hud.breath * 100.0);
        color.0 = if hud.sprint_locked { BREATH_LOCKED_COLOR } else { BREATH_COLOR };
    }
    for (mut text, mut vis) in &mut q_banner {
        match hud.death {
            Some(cause) => {
                text.0 = banner_text(cause).to_string();
                *vis = Visibility::Visible;
            }
            None => *vis = Visibility::Hidden,
        }
    }
}
