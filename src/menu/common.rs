use bevy::prelude::*;

pub(super) fn start_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
pub(super) fn start_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(super) fn start_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
pub(super) fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
pub(super) fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
pub(super) fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
pub(super) fn back_bg() -> Color {
    Color::srgb(0.12, 0.12, 0.18)
}
pub(super) fn back_border() -> Color {
    Color::srgb(0.30, 0.30, 0.46)
}
pub(super) fn back_text() -> Color {
    Color::srgb(0.55, 0.55, 0.70)
}
pub(super) fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(super) fn record_color() -> Color {
    Color::srgb(1.0, 0.80, 0.25)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.28, 0.28, 0.35)
}

pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

pub(super) fn label(parent: &mut ChildSpawnerCommands<'_>, text: impl Into<String>, size: f32, color: Color) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    ));
}

/// Spawn a 220×50 bordered button carrying `marker`, labelled `text`.
pub(super) fn menu_button(
    parent: &mut ChildSpawnerCommands<'_>,
    text: &str,
    bg: Color,
    border: Color,
    text_color: Color,
    marker: impl Component,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            marker,
        ))
        .with_children(|btn| label(btn, text, 18.0, text_color));
}

/// Tint a button's label white on hover and back to `idle` otherwise.
pub(super) fn tint_label(
    interaction: &Interaction,
    children: &Children,
    btn_text: &mut Query<&mut TextColor>,
    idle: Color,
) {
    let color = match interaction {
        Interaction::Hovered => Color::WHITE,
        Interaction::None => idle,
        Interaction::Pressed => return,
    };
    for child in children.iter() {
        if let Ok(mut c) = btn_text.get_mut(child) {
            *c = TextColor(color);
        }
    }
}
