use super::*;

/// Spawn the game-over card over the frozen well.
///
/// Runs after the run is finalised so [`HighScore`] already holds the new best.
pub fn setup_game_over(mut commands: Commands, score: Res<Score>, high: Res<HighScore>) {
    let new_record = score.is_new_record(high.0);
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.72)),
            ZIndex(300),
            GameOverRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(36.0)),
                        row_gap: Val::Px(12.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(300.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.05, 0.03, 0.08)),
                    BorderColor::all(Color::srgb(0.55, 0.20, 0.60)),
                ))
                .with_children(|card| {
                    label(card, "GAME OVER", 44.0, Color::srgb(1.0, 0.30, 0.30));
                    spacer(card, 4.0);
                    label(card, format!("Score: {}", score.points), 22.0, title_color());
                    label(card, format!("Best: {}", high.0), 16.0, subtitle_color());
                    if new_record {
                        label(card, "NEW RECORD!", 20.0, record_color());
                    }
                    spacer(card, 8.0);
                    menu_button(card, "RETRY", start_bg(), start_border(), start_text(), GameOverRetryButton);
                    menu_button(card, "MENU", back_bg(), back_border(), back_text(), GameOverMenuButton);
                    spacer(card, 4.0);
                    label(card, "Enter to retry  ·  Esc for menu", 12.0, hint_color());
                });
        });
}

/// Recursively despawn the game-over overlay.
pub fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Handle RETRY (Enter) and MENU (Escape) on the game-over card.
#[allow(clippy::type_complexity)]
pub fn game_over_button_system(
    retry_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<GameOverRetryButton>)>,
    menu_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<GameOverMenuButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut cues: MessageWriter<SoundCue>,
) {
    let wants_retry = keys.just_pressed(KeyCode::Enter)
        || retry_query.iter().any(|(i, _)| *i == Interaction::Pressed);
    let wants_menu = keys.just_pressed(KeyCode::Escape)
        || menu_query.iter().any(|(i, _)| *i == Interaction::Pressed);

    if wants_retry {
        cues.write(SoundCue::UiClick);
        next_state.set(GameState::Playing);
        return;
    }
    if wants_menu {
        cues.write(SoundCue::UiClick);
        next_state.set(GameState::MainMenu);
        return;
    }

    for (interaction, children) in retry_query.iter() {
        tint_label(interaction, children, &mut btn_text, start_text());
    }
    for (interaction, children) in menu_query.iter() {
        tint_label(interaction, children, &mut btn_text, back_text());
    }
}
