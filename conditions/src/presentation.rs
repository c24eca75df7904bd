use std::collections::HashMap;

use crate::constant::TextPosition;
use crate::evaluator::ConditionSnapshot;

/// Drawing operations the indicator needs from a chart.
pub trait DrawSurface {
    fn remove_draw_object(&mut self, tag: &str);
    fn draw_text_fixed(&mut self, tag: &str, text: &str, position: TextPosition);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub text: String,
    pub position: TextPosition,
}

/// In-memory chart keeping drawn text objects by tag.
#[derive(Debug, Default)]
pub struct ChartOverlay {
    objects: HashMap<String, TextObject>,
    draw_count: u64,
}

impl ChartOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: &str) -> Option<&TextObject> {
        self.objects.get(tag)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total draw calls since creation, including replaced objects.
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }
}

impl DrawSurface for ChartOverlay {
    fn remove_draw_object(&mut self, tag: &str) {
        self.objects.remove(tag);
    }

    fn draw_text_fixed(&mut self, tag: &str, text: &str, position: TextPosition) {
        self.draw_count += 1;
        self.objects.insert(
            tag.to_string(),
            TextObject {
                text: text.to_string(),
                position,
            },
        );
    }
}

fn label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|x| x.to_string()).unwrap_or_default()
}

pub fn format_overlay(instrument: &str, snapshot: &ConditionSnapshot) -> String {
    let verdict = snapshot.verdict();
    format!(
        "{instrument}\nVolatility: {:.2}%\n{}: {} Day | Trend: {}\nConditions: {} {}",
        snapshot.volatility_percent,
        label(snapshot.tline_bias),
        label(snapshot.range_position),
        label(snapshot.trend_status),
        verdict.icon(),
        verdict.label(),
    )
}

/// Replaces whatever was drawn under `tag` with the current overlay text.
pub fn render<S: DrawSurface + ?Sized>(
    surface: &mut S,
    tag: &str,
    position: TextPosition,
    instrument: &str,
    snapshot: &ConditionSnapshot,
) -> String {
    let text = format_overlay(instrument, snapshot);
    surface.remove_draw_object(tag);
    surface.draw_text_fixed(tag, &text, position);
    text
}
