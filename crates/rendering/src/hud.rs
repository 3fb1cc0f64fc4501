// HUD: next-fruit preview, quit control with confirmation, game-over overlay.
// Buttons carry a `HudAction`; a single system maps pressed buttons to dialog changes or
// `RestartRequested`. Full-screen overlays carry `Interaction` so presses on them register
// as UI presses and never reach the drop gesture.

use bevy::prelude::*;
use fm_core::{FruitCatalog, GameOver, GameSession, Rank, RestartRequested};

use crate::palette::Palette;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudAction {
    OpenQuitDialog,
    ConfirmQuit,
    CancelQuit,
    Restart,
}

/// Image slot of the "NEXT" panel. `rank` mirrors what is displayed.
#[derive(Component, Debug, Default)]
pub struct NextFruitImage {
    pub rank: Option<Rank>,
}

#[derive(Component, Debug)]
pub struct QuitDialog;

#[derive(Component, Debug)]
pub struct GameOverOverlay;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud).add_systems(
            Update,
            (
                update_next_preview,
                open_dialog_on_escape,
                handle_hud_buttons,
                show_game_over,
                clear_overlays_on_restart,
            )
                .chain(),
        );
    }
}

fn panel_node() -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: Val::Px(16.0),
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        ..default()
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                left: Val::Px(16.0),
                width: Val::Px(60.0),
                height: Val::Px(60.0),
                ..panel_node()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(Palette::PANEL),
            Name::new("NextPanel"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("NEXT"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Palette::NEXT_LABEL),
            ));
            panel.spawn((
                NextFruitImage::default(),
                ImageNode::default(),
                Node {
                    width: Val::Px(32.0),
                    height: Val::Px(32.0),
                    margin: UiRect::top(Val::Px(4.0)),
                    ..default()
                },
            ));
        });

    commands
        .spawn((
            Button,
            HudAction::OpenQuitDialog,
            Node {
                right: Val::Px(16.0),
                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                ..panel_node()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(Palette::PANEL),
            Name::new("QuitButton"),
        ))
        .with_child((
            Text::new("Quit"),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Palette::QUIT_TEXT),
        ));
}

/// Full-screen scrim with a centered panel; `children` fills the panel.
fn spawn_modal(
    commands: &mut Commands,
    marker: impl Bundle,
    children: impl FnOnce(&mut ChildSpawnerCommands),
) {
    commands
        .spawn((
            marker,
            Interaction::default(),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Palette::SCRIM),
            GlobalZIndex(10),
        ))
        .with_children(|scrim| {
            scrim
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.0),
                        padding: UiRect::all(Val::Px(20.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(12.0)),
                    BackgroundColor(Color::WHITE),
                ))
                .with_children(children);
        });
}

fn spawn_button(parent: &mut ChildSpawnerCommands, label: &str, action: HudAction) {
    parent
        .spawn((
            Button,
            action,
            Node {
                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(8.0)),
            BackgroundColor(Palette::BACKGROUND),
        ))
        .with_child((Text::new(label), TextColor(Palette::DIALOG_TEXT)));
}

fn update_next_preview(
    session: Res<GameSession>,
    catalog: Res<FruitCatalog>,
    asset_server: Option<Res<AssetServer>>,
    mut q_image: Query<(&mut NextFruitImage, &mut ImageNode)>,
) {
    if !session.is_changed() {
        return;
    }
    let preview = session.next_preview();
    for (mut slot, mut image) in &mut q_image {
        if slot.rank == preview {
            continue;
        }
        slot.rank = preview;
        let Some(descriptor) = preview.and_then(|r| catalog.get(r)) else {
            image.image = Handle::default();
            continue;
        };
        if let Some(server) = asset_server.as_deref() {
            image.image = server.load(descriptor.image_path());
        }
    }
}

fn open_dialog_on_escape(
    mut commands: Commands,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    q_dialog: Query<(), With<QuitDialog>>,
) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::Escape)) && q_dialog.is_empty() {
        spawn_quit_dialog(&mut commands);
    }
}

fn spawn_quit_dialog(commands: &mut Commands) {
    spawn_modal(commands, (QuitDialog, Name::new("QuitDialog")), |panel| {
        panel.spawn((Text::new("Quit this game?"), TextColor(Palette::DIALOG_TEXT)));
        panel
            .spawn(Node {
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                spawn_button(row, "Yes", HudAction::ConfirmQuit);
                spawn_button(row, "No", HudAction::CancelQuit);
            });
    });
}

fn handle_hud_buttons(
    mut commands: Commands,
    q_buttons: Query<(&Interaction, &HudAction), (Changed<Interaction>, With<Button>)>,
    q_dialog: Query<Entity, With<QuitDialog>>,
    mut restart: EventWriter<RestartRequested>,
) {
    for (interaction, action) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            HudAction::OpenQuitDialog => {
                if q_dialog.is_empty() {
                    spawn_quit_dialog(&mut commands);
                }
            }
            HudAction::CancelQuit => {
                for e in &q_dialog {
                    commands.entity(e).despawn();
                }
            }
            HudAction::ConfirmQuit | HudAction::Restart => {
                info!(target: "session", "restart requested ({action:?})");
                restart.write(RestartRequested);
            }
        }
    }
}

fn show_game_over(
    mut commands: Commands,
    mut events: EventReader<GameOver>,
    q_overlay: Query<(), With<GameOverOverlay>>,
) {
    let Some(over) = events.read().last() else {
        return;
    };
    if !q_overlay.is_empty() {
        return;
    }
    let stats = over.stats;
    spawn_modal(
        &mut commands,
        (GameOverOverlay, Name::new("GameOverOverlay")),
        |panel| {
            panel.spawn((
                Text::new("Game Over"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Palette::QUIT_TEXT),
            ));
            panel.spawn((
                Text::new(format!(
                    "Drops: {}  Merges: {}  Best: {}",
                    stats.drops, stats.merges, stats.highest_rank
                )),
                TextColor(Palette::DIALOG_TEXT),
            ));
            spawn_button(panel, "Restart", HudAction::Restart);
        },
    );
}

fn clear_overlays_on_restart(
    mut commands: Commands,
    mut events: EventReader<RestartRequested>,
    q_modals: Query<Entity, Or<(With<QuitDialog>, With<GameOverOverlay>)>>,
) {
    if events.read().last().is_none() {
        return;
    }
    for e in &q_modals {
        commands.entity(e).despawn();
    }
}
