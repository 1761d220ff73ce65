mod tests {
    use rgbcww_composer::curve::{
        FadeCurve, ease_in_out_quart, ease_in_quart, ease_out_quart, linear,
    };

    const EASED: [FadeCurve; 4] = [
        FadeCurve::Linear,
        FadeCurve::EaseIn,
        FadeCurve::EaseOut,
        FadeCurve::EaseInOut,
    ];

    #[test]
    fn test_curves_hit_both_ends() {
        for curve in EASED {
            assert_eq!(curve.value_at(0.0, 100, 3000), 100, "{curve:?}");
            assert_eq!(curve.value_at(1.0, 100, 3000), 3000, "{curve:?}");
            assert_eq!(curve.value_at(0.0, 4095, 0), 4095, "{curve:?}");
            assert_eq!(curve.value_at(1.0, 4095, 0), 0, "{curve:?}");
        }
    }

    #[test]
    fn test_curves_constant_segment() {
        for curve in EASED {
            for step in 0..=10 {
                let percent = step as f32 / 10.0;
                assert_eq!(curve.value_at(percent, 512, 512), 512);
            }
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for curve in EASED {
            let mut rising = 0;
            let mut falling = u16::MAX;
            for step in 0..=100 {
                let percent = step as f32 / 100.0;
                let up = curve.value_at(percent, 0, 4095);
                let down = curve.value_at(percent, 4095, 0);
                assert!(up >= rising, "{curve:?} at {percent}");
                assert!(down <= falling, "{curve:?} at {percent}");
                rising = up;
                falling = down;
            }
        }
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(linear(-0.5, 10, 20), 10);
        assert_eq!(linear(7.0, 10, 20), 20);
        assert_eq!(linear(f32::NAN, 10, 20), 10);
    }

    #[test]
    fn test_none_is_instant() {
        assert_eq!(FadeCurve::None.value_at(0.0, 0, 255), 255);
        assert_eq!(FadeCurve::None.value_at(0.3, 4095, 7), 7);
    }

    #[test]
    fn test_quartic_shapes() {
        assert_eq!(linear(0.5, 0, 4000), 2000);
        // 0.5^4 = 0.0625
        assert_eq!(ease_in_quart(0.5, 0, 4000), 250);
        // 1 - 0.5^4 = 0.9375
        assert_eq!(ease_out_quart(0.5, 0, 4000), 3750);
        // 8 * 0.25^4 = 0.03125
        assert_eq!(ease_in_out_quart(0.25, 0, 4000), 125);
        // 1 - 0.5^4 / 2 = 0.96875
        assert_eq!(ease_in_out_quart(0.75, 0, 4000), 3875);
        assert_eq!(
            ease_in_out_quart(0.3, 4095, 0),
            FadeCurve::EaseInOut.value_at(0.3, 4095, 0)
        );
    }

    #[test]
    fn test_fade_curve_from_raw() {
        assert_eq!(FadeCurve::from_raw(0), Some(FadeCurve::None));
        assert_eq!(FadeCurve::from_raw(4), Some(FadeCurve::EaseInOut));
        assert_eq!(FadeCurve::from_raw(5), None);
    }
}
