use crossbeam_channel::Sender;
use egui::{pos2, vec2, Align2, Color32, CornerRadius, FontId, Rect, Sense, Stroke, StrokeKind, Ui};
use crate::core::input::{PointerSample, PointerTracker};
use crate::core::note::Note;
use crate::core::synth::KeyInfo;
use crate::messaging::SynthMessage;
use crate::utils::helpers::format_frequency;

const BLACK_KEY_WIDTH: f32 = 0.6;
const BLACK_KEY_HEIGHT: f32 = 0.62;
const KEYBOARD_HEIGHT: f32 = 180.0;

const WHITE_FILL: Color32 = Color32::from_rgb(245, 245, 240);
const BLACK_FILL: Color32 = Color32::from_rgb(30, 30, 34);
const PRESSED_FILL: Color32 = Color32::from_rgb(0, 188, 212);
const HOVER_FILL: Color32 = Color32::from_rgb(200, 236, 242);

/// Key rectangles for one keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    pub white: Vec<(KeyInfo, Rect)>,
    pub black: Vec<(KeyInfo, Rect)>,
}

impl KeyLayout {
    /// White keys share the width evenly, each sharp sits on the seam
    /// before the next natural.
    pub fn new(keys: &[KeyInfo], rect: Rect) -> Self {
        let white_count = keys.iter().filter(|k| !k.is_sharp).count().max(1);
        let white_width = rect.width() / white_count as f32;
        let black_size = vec2(white_width * BLACK_KEY_WIDTH, rect.height() * BLACK_KEY_HEIGHT);

        let mut white = Vec::new();
        let mut black = Vec::new();
        for key in keys {
            let seam = rect.left() + white.len() as f32 * white_width;
            if key.is_sharp {
                let min = pos2(seam - black_size.x / 2.0, rect.top());
                black.push((*key, Rect::from_min_size(min, black_size)));
            } else {
                let min = pos2(seam, rect.top());
                white.push((*key, Rect::from_min_size(min, vec2(white_width, rect.height()))));
            }
        }

        Self { white, black }
    }

    /// The key under `pos`. Sharps are on top.
    pub fn hit_test(&self, pos: egui::Pos2) -> Option<&KeyInfo> {
        self.black
            .iter()
            .chain(self.white.iter())
            .find(|(_, rect)| rect.contains(pos))
            .map(|(key, _)| key)
    }

    pub fn note_at(&self, pos: egui::Pos2) -> Option<Note> {
        self.hit_test(pos).map(|key| key.note)
    }
}

/// The on-screen keyboard. Pointer input goes out as messages,
/// pressed state comes back in through `KeyInfo`.
pub struct KeyboardView {
    tracker: PointerTracker,
    sender: Sender<SynthMessage>,
}

impl KeyboardView {
    pub fn new(sender: Sender<SynthMessage>) -> Self {
        Self {
            tracker: PointerTracker::new(),
            sender,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, keys: &[KeyInfo]) {
        let size = vec2(ui.available_width(), KEYBOARD_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let layout = KeyLayout::new(keys, rect);

        let (hover_pos, primary_pressed, primary_released, primary_down) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
            )
        });
        let sample = PointerSample {
            hovered: hover_pos.and_then(|pos| layout.note_at(pos)),
            primary_pressed,
            primary_released,
            primary_down,
        };

        for event in self.tracker.input_events(sample) {
            log::trace!("keyboard {:?}", event);
            self.sender.send(SynthMessage::Input(event)).ok();
        }

        if ui.is_rect_visible(rect) {
            self.paint(ui, &layout);
        }

        if let Some(key) = hover_pos.and_then(|pos| layout.hit_test(pos)) {
            response.on_hover_text(format!("{} {}", key.note, format_frequency(key.frequency)));
        }
    }

    fn paint(&self, ui: &Ui, layout: &KeyLayout) {
        let painter = ui.painter();
        let hovered = self.tracker.hovered();
        let outline = Stroke::new(1.0, Color32::from_gray(60));

        for (key, rect) in &layout.white {
            let fill = if key.pressed {
                PRESSED_FILL
            } else if hovered == Some(key.note) {
                HOVER_FILL
            } else {
                WHITE_FILL
            };
            painter.rect(*rect, CornerRadius::same(3), fill, outline, StrokeKind::Inside);

            if key.pressed || key.note.chroma.index() == 0 {
                painter.text(
                    rect.center_bottom() - vec2(0.0, 6.0),
                    Align2::CENTER_BOTTOM,
                    key.note.to_string(),
                    FontId::proportional(11.0),
                    Color32::from_gray(40),
                );
            }
        }

        for (key, rect) in &layout.black {
            let fill = if key.pressed { PRESSED_FILL } else { BLACK_FILL };
            painter.rect(*rect, CornerRadius::same(2), fill, outline, StrokeKind::Inside);

            if key.pressed {
                painter.text(
                    rect.center_bottom() - vec2(0.0, 4.0),
                    Align2::CENTER_BOTTOM,
                    key.note.to_string(),
                    FontId::proportional(9.0),
                    Color32::WHITE,
                );
            }
        }
    }
}
