use std::f64::consts::TAU;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        Widget,
    },
};

const SAMPLES: usize = 180;

/// Circular progress indicator: the lit arc starts at twelve o'clock and
/// runs clockwise for `progress` of the full turn.
#[derive(Clone, Copy, Debug)]
pub struct Dial {
    progress: f64,
    color: Color,
}

impl Dial {
    pub fn new(progress: f64) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            color: Color::Cyan,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Split the unit circle into (lit, unlit) sample points
pub fn arc_points(progress: f64, samples: usize) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut lit = Vec::new();
    let mut unlit = Vec::new();
    for i in 0..samples {
        let t = i as f64 / samples as f64;
        let point = ((TAU * t).sin(), (TAU * t).cos());
        if t < progress {
            lit.push(point);
        } else {
            unlit.push(point);
        }
    }
    (lit, unlit)
}

impl Widget for Dial {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (lit, unlit) = arc_points(self.progress, SAMPLES);
        let color = self.color;

        // terminal cells are roughly twice as tall as wide
        let aspect = if area.height > 0 {
            (area.width as f64 / (area.height as f64 * 2.0)).max(1.0)
        } else {
            1.0
        };

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.1 * aspect, 1.1 * aspect])
            .y_bounds([-1.1, 1.1])
            .paint(move |ctx| {
                ctx.draw(&Points {
                    coords: &unlit,
                    color: Color::DarkGray,
                });
                ctx.draw(&Points {
                    coords: &lit,
                    color,
                });
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_progress_lights_whole_circle() {
        let (lit, unlit) = arc_points(1.0, 100);
        assert_eq!(lit.len(), 100);
        assert!(unlit.is_empty());
    }

    #[test]
    fn zero_progress_lights_nothing() {
        let (lit, unlit) = arc_points(0.0, 100);
        assert!(lit.is_empty());
        assert_eq!(unlit.len(), 100);
    }

    #[test]
    fn arc_starts_at_top_and_runs_clockwise() {
        let (lit, _) = arc_points(0.25, 100);
        assert_eq!(lit.len(), 25);
        let (x0, y0) = lit[0];
        assert!(x0.abs() < 1e-9 && (y0 - 1.0).abs() < 1e-9);
        // a quarter turn clockwise from the top stays on the right half
        assert!(lit.iter().all(|(x, _)| *x >= -1e-9));
    }
}
