use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::RGBColor;
use sweepcore::display::Colormap;

/// Maps gate values onto colors for one colormap and color range.
pub struct ColorScale<'a> {
    cmap: &'a Colormap,
    vmin: f64,
    vmax: f64,
}

impl<'a> ColorScale<'a> {
    pub fn new(cmap: &'a Colormap, vmin: f64, vmax: f64) -> Self {
        Self { cmap, vmin, vmax }
    }

    /// Position of `value` within the range, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    /// `None` for non-finite values and for values a listed map leaves uncolored.
    pub fn color(&self, value: f64) -> Option<RGBColor> {
        if !value.is_finite() {
            return None;
        }
        match self.cmap {
            Colormap::Jet => Some(jet(self.normalize(value))),
            Colormap::Viridis => Some(ViridisRGB.get_color(self.normalize(value))),
            Colormap::Greys => Some(greys(self.normalize(value))),
            Colormap::Listed(listed) => listed
                .get_rgb(value)
                .map(|rgb| RGBColor(rgb.red, rgb.green, rgb.blue)),
        }
    }
}

fn channel(level: f64) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0) as u8
}

fn jet(t: f64) -> RGBColor {
    let four_t = 4.0 * t;
    RGBColor(
        channel(1.5 - (four_t - 3.0).abs()),
        channel(1.5 - (four_t - 2.0).abs()),
        channel(1.5 - (four_t - 1.0).abs()),
    )
}

// white for low values, black for high
fn greys(t: f64) -> RGBColor {
    let level = channel(1.0 - t);
    RGBColor(level, level, level)
}
