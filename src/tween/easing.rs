//! Easing curves: linear plus ten families, each with in, out and in-out
//! variants (see easings.net). Every curve maps 0 to 0 and 1 to 1; back and
//! elastic overshoot in between.

use std::f64::consts::PI;

const BACK: f64 = 1.70158;
const BACK_IN_OUT: f64 = BACK * 1.525;
const ELASTIC: f64 = (2.0 * PI) / 3.0;
const ELASTIC_IN_OUT: f64 = (2.0 * PI) / 4.5;
const BOUNCE_AMPLITUDE: f64 = 7.5625;
const BOUNCE_DURATION: f64 = 2.75;

/// Easing curve applied to a tween's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Easing {
    /// Every curve, in declaration order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Map linear progress `t` (clamped to `0..=1`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            Easing::QuadIn => power_in(t, 2),
            Easing::QuadOut => power_out(t, 2),
            Easing::QuadInOut => power_in_out(t, 2),
            Easing::CubicIn => power_in(t, 3),
            Easing::CubicOut => power_out(t, 3),
            Easing::CubicInOut => power_in_out(t, 3),
            Easing::QuartIn => power_in(t, 4),
            Easing::QuartOut => power_out(t, 4),
            Easing::QuartInOut => power_in_out(t, 4),
            Easing::QuintIn => power_in(t, 5),
            Easing::QuintOut => power_out(t, 5),
            Easing::QuintInOut => power_in_out(t, 5),

            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            Easing::BackIn => (BACK + 1.0) * t * t * t - BACK * t * t,
            Easing::BackOut => 1.0 + (BACK + 1.0) * (t - 1.0).powi(3) + BACK * (t - 1.0).powi(2),
            Easing::BackInOut => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_IN_OUT + 1.0) * 2.0 * t - BACK_IN_OUT)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_IN_OUT + 1.0) * (t * 2.0 - 2.0) + BACK_IN_OUT) + 2.0) / 2.0
                }
            }

            Easing::ElasticIn => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -2f64.powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * ELASTIC).sin()
                }
            }
            Easing::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC).sin() + 1.0
                }
            }
            Easing::ElasticInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin()) / 2.0
                } else {
                    (2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin()) / 2.0 + 1.0
                }
            }

            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }

    /// Whether the curve can leave `0..=1` between the endpoints.
    pub fn overshoots(self) -> bool {
        matches!(
            self,
            Easing::BackIn
                | Easing::BackOut
                | Easing::BackInOut
                | Easing::ElasticIn
                | Easing::ElasticOut
                | Easing::ElasticInOut
        )
    }
}

fn power_in(t: f64, n: i32) -> f64 {
    t.powi(n)
}

fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

fn power_in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_DURATION {
        BOUNCE_AMPLITUDE * t * t
    } else if t < 2.0 / BOUNCE_DURATION {
        let t = t - 1.5 / BOUNCE_DURATION;
        BOUNCE_AMPLITUDE * t * t + 0.75
    } else if t < 2.5 / BOUNCE_DURATION {
        let t = t - 2.25 / BOUNCE_DURATION;
        BOUNCE_AMPLITUDE * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_DURATION;
        BOUNCE_AMPLITUDE * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn every_curve_hits_both_endpoints() {
        for easing in Easing::ALL {
            assert!(close(easing.apply(0.0), 0.0), "{easing:?} at 0 = {}", easing.apply(0.0));
            assert!(close(easing.apply(1.0), 1.0), "{easing:?} at 1 = {}", easing.apply(1.0));
        }
    }

    #[test]
    fn non_overshooting_curves_stay_in_range() {
        for easing in Easing::ALL.into_iter().filter(|e| !e.overshoots()) {
            for step in 0..=100 {
                let v = easing.apply(f64::from(step) / 100.0);
                assert!((-1e-9..=1.0 + 1e-9).contains(&v), "{easing:?} left range: {v}");
            }
        }
    }

    #[test]
    fn in_out_curves_pass_through_half() {
        for easing in [
            Easing::SineInOut,
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::QuartInOut,
            Easing::QuintInOut,
            Easing::CircInOut,
            Easing::BounceInOut,
        ] {
            assert!(close(easing.apply(0.5), 0.5), "{easing:?} at 0.5 = {}", easing.apply(0.5));
        }
    }

    #[test]
    fn known_samples() {
        assert!(close(Easing::Linear.apply(0.25), 0.25));
        assert!(close(Easing::QuadIn.apply(0.5), 0.25));
        assert!(close(Easing::CubicOut.apply(0.5), 0.875));
        assert!(close(Easing::QuartInOut.apply(0.25), 8.0 * 0.25f64.powi(4)));
        assert!(close(Easing::ExpoIn.apply(0.5), 2f64.powf(-5.0)));
        assert!(close(Easing::BounceOut.apply(0.2), BOUNCE_AMPLITUDE * 0.04));
    }

    #[test]
    fn back_and_elastic_overshoot() {
        assert!(Easing::BackIn.apply(0.2) < 0.0);
        assert!(Easing::BackOut.apply(0.8) > 1.0);
        assert!(Easing::ElasticOut.apply(0.1) > 1.0);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::QuadIn.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadIn.apply(2.0), 1.0);
    }
}
