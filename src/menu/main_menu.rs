use super::*;

/// Spawn the full-screen title screen.
///
/// Layout:
/// ```text
/// ┌──────────────────────────────┐
/// │        COSMIC FUSION         │
/// │   Drop, merge, don't spill   │
/// │          Best: 1234          │
/// │                              │
/// │         [  START  ]          │
/// │         [  QUIT   ]          │
/// │                              │
/// │    Enter to start · ←/→ aim  │
/// └──────────────────────────────┘
/// ```
pub fn setup_main_menu(mut commands: Commands, high: Res<HighScore>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgb(0.01, 0.01, 0.04)),
            MainMenuRoot,
        ))
        .with_children(|root| {
            label(root, "COSMIC FUSION", 52.0, title_color());
            spacer(root, 10.0);
            label(root, "Drop planets, merge pairs, stay below the line", 16.0, subtitle_color());
            spacer(root, 18.0);
            label(root, format!("Best: {}", high.0), 20.0, record_color());
            spacer(root, 40.0);
            menu_button(root, "START", start_bg(), start_border(), start_text(), MenuStartButton);
            spacer(root, 14.0);
            menu_button(root, "QUIT", quit_bg(), quit_border(), quit_text(), MenuQuitButton);
            spacer(root, 40.0);
            label(
                root,
                "Enter to start  ·  mouse or ←/→ to aim  ·  click or Space to drop",
                12.0,
                hint_color(),
            );
        });
}

/// Recursively despawn the title screen.
pub fn cleanup_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Handle START (or Enter) and QUIT on the title screen.
#[allow(clippy::type_complexity)]
pub fn main_menu_button_system(
    start_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuStartButton>)>,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuQuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
    mut cues: MessageWriter<SoundCue>,
) {
    let wants_start = keys.just_pressed(KeyCode::Enter)
        || start_query.iter().any(|(i, _)| *i == Interaction::Pressed);
    if wants_start {
        cues.write(SoundCue::UiClick);
        next_state.set(GameState::Playing);
        return;
    }

    for (interaction, children) in start_query.iter() {
        tint_label(interaction, children, &mut btn_text, start_text());
    }

    for (interaction, children) in quit_query.iter() {
        if *interaction == Interaction::Pressed {
            cues.write(SoundCue::UiClick);
            exit.write(bevy::app::AppExit::Success);
        } else {
            tint_label(interaction, children, &mut btn_text, quit_text());
        }
    }
}
