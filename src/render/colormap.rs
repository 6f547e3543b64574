use plotters::style::RGBColor;
use std::f64::consts::PI;

/// Fill for the base layer and for under-range choropleth values.
pub const BASE_GREY: RGBColor = RGBColor(128, 128, 128);

/// Position of `value` within [vmin, vmax], clamped to [0, 1].
pub fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
    if vmax <= vmin {
        return 0.0;
    }
    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}

/// Rainbow ramp: violet at 0, through green, to red at 1.
pub fn rainbow(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let r = (2.0 * t - 0.5).abs().clamp(0.0, 1.0);
    let g = (PI * t).sin().clamp(0.0, 1.0);
    let b = (PI * t / 2.0).cos().clamp(0.0, 1.0);
    RGBColor(channel(r), channel(g), channel(b))
}

/// Choropleth fill for a merged value; under-range values keep the grey.
pub fn color_for(value: f64, vmin: f64, vmax: f64) -> RGBColor {
    if value < vmin {
        BASE_GREY
    } else {
        rainbow(normalize(value, vmin, vmax))
    }
}

/// Round to the nearest hundred, ties to even; used for the colorbar
/// ceiling.
pub fn round_to_hundreds(value: f64) -> f64 {
    let scaled = value / 100.0;
    let rounded = if scaled.fract() == 0.5 {
        let below = scaled.floor();
        if below % 2.0 == 0.0 {
            below
        } else {
            below + 1.0
        }
    } else {
        scaled.round()
    };
    rounded * 100.0
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_runs_violet_to_red() {
        assert_eq!(rainbow(0.0), RGBColor(128, 0, 255));
        assert_eq!(rainbow(1.0), RGBColor(255, 0, 0));
        // clamped outside [0, 1]
        assert_eq!(rainbow(-3.0), rainbow(0.0));
        assert_eq!(rainbow(7.0), rainbow(1.0));
    }

    #[test]
    fn midpoint_is_green_dominated() {
        let RGBColor(r, g, b) = rainbow(0.5);
        assert_eq!(g, 255);
        assert!(g > r && g > b);
    }

    #[test]
    fn normalize_is_linear_and_clamped() {
        assert_eq!(normalize(50.0, 0.0, 100.0), 0.5);
        assert_eq!(normalize(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(normalize(500.0, 0.0, 100.0), 1.0);
        // degenerate range
        assert_eq!(normalize(5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn under_range_values_stay_grey() {
        assert_eq!(color_for(0.0, 0.00001, 100.0), BASE_GREY);
        assert_ne!(color_for(1.0, 0.00001, 100.0), BASE_GREY);
    }

    #[test]
    fn vmax_rounds_to_hundreds() {
        assert_eq!(round_to_hundreds(391.62), 400.0);
        assert_eq!(round_to_hundreds(1249.99), 1200.0);
        assert_eq!(round_to_hundreds(0.0), 0.0);
    }

    #[test]
    fn vmax_ties_round_to_the_even_hundred() {
        assert_eq!(round_to_hundreds(250.0), 200.0);
        assert_eq!(round_to_hundreds(350.0), 400.0);
        assert_eq!(round_to_hundreds(1250.0), 1200.0);
        assert_eq!(round_to_hundreds(1350.0), 1400.0);
    }
}
