mod common;

mod tests {
    use super::common::{clock, frame};
    use rgbcww_composer::color::RED;
    use rgbcww_composer::{
        Channel, ChannelLevel, FadeEngine, FadeProfile, FadeSpec, HighLevelCommand,
        LowLevelCommand, SingleEffect, StripId, StripIntent,
    };

    fn red_intent() -> StripIntent {
        StripIntent {
            power: true,
            command: HighLevelCommand {
                color: RED,
                color_brightness: 4095,
                ..HighLevelCommand::default()
            },
            effect: SingleEffect::None,
        }
    }

    fn red_at(engine: &FadeEngine, brightness: u16) -> LowLevelCommand {
        engine
            .template()
            .with_rgb(RED)
            .with_rgb_brightness(brightness, FadeSpec::linear(800))
    }

    #[test]
    fn test_fade_settles_on_target() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);

        let mut settled_at = None;
        for tick in 0..200 {
            if engine.fade_to(StripId::One, red_intent(), frame(tick)) {
                settled_at = Some(tick);
                break;
            }
        }
        // Color fades take 1000 ms at 11 ms per frame: the target is reached
        // on frame 91 and reported one frame later
        assert_eq!(settled_at, Some(92));

        let levels = engine.levels(StripId::One);
        assert_eq!(
            levels[Channel::Red],
            ChannelLevel {
                color: 255,
                brightness: 4095
            }
        );
        assert_eq!(levels[Channel::Green].brightness, 4095);
        assert_eq!(levels[Channel::Green].color, 0);

        for tick in 93..120 {
            assert!(engine.fade_to(StripId::One, red_intent(), frame(tick)));
            assert_eq!(engine.levels(StripId::One), levels);
        }
        assert!(engine.strip(StripId::One).is_settled());
    }

    #[test]
    fn test_other_strip_untouched() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        for tick in 0..100 {
            engine.fade_to(StripId::One, red_intent(), frame(tick));
        }
        assert_eq!(
            engine.levels(StripId::Two)[Channel::Red],
            ChannelLevel::default()
        );
        assert_eq!(engine.strip(StripId::Two).last_tick(), None);
    }

    #[test]
    fn test_gap_restarts_from_anchor() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let command = red_at(&engine, 4095);

        for tick in 0..50 {
            engine.fade_to(StripId::One, command, frame(tick));
        }
        let midway = engine.levels(StripId::One)[Channel::Red].brightness;
        assert!(midway > 2000 && midway < 4095, "{midway}");

        // Frames 50..60 skipped: elapsed time starts over at the anchor
        assert!(!engine.fade_to(StripId::One, command, frame(60)));
        assert_eq!(engine.levels(StripId::One)[Channel::Red].brightness, 0);

        let fade = engine.strip(StripId::One).channels()[Channel::Red].brightness;
        assert_eq!(fade.anchor(), 0);
        assert_eq!(fade.started(), frame(60).now);
    }

    #[test]
    fn test_retarget_interpolates_from_anchor() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);

        let full = red_at(&engine, 4095);
        let dimmed = red_at(&engine, 1000);

        for tick in 0..37 {
            engine.fade_to(StripId::One, full, frame(tick));
        }
        assert!(engine.levels(StripId::One)[Channel::Red].brightness > 1900);

        // Frame 37 is 407 ms into the fade that started from 0
        engine.fade_to(StripId::One, dimmed, frame(37));
        assert_eq!(engine.levels(StripId::One)[Channel::Red].brightness, 509);

        // The unreached full-brightness target never became the anchor
        let fade = engine.strip(StripId::One).channels()[Channel::Red].brightness;
        assert_eq!(fade.anchor(), 0);
        assert_eq!(fade.started(), frame(0).now);
    }

    #[test]
    fn test_timestamp_slides_while_settled() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let full = red_at(&engine, 4095);
        for tick in 0..100 {
            assert!(engine.fade_to_black(StripId::One, frame(tick)));
        }

        // The new fade counts from the previous frame
        engine.fade_to(StripId::One, full, frame(100));
        assert_eq!(engine.levels(StripId::One)[Channel::Red].brightness, 56);
    }

    #[test]
    fn test_set_to_applies_immediately() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        assert!(engine.set_to(StripId::Two, red_intent(), clock(5000, 7)));
        let levels = engine.levels(StripId::Two);
        assert_eq!(levels[Channel::Red].color, 255);
        assert_eq!(levels[Channel::Blue].brightness, 4095);
        assert_eq!(levels[Channel::ColdWhite].color, 255);
        assert_eq!(levels[Channel::WarmWhite].brightness, 0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let command = engine
            .template()
            .with_color(Channel::ColdWhite, 200)
            .with_brightness(Channel::ColdWhite, 3000);
        let command = LowLevelCommand::combine(
            &command,
            &LowLevelCommand::from_profile(&FadeProfile {
                white_temperature: FadeSpec::linear(0),
                white_brightness: FadeSpec::linear(0),
                ..FadeProfile::DEFAULT
            }),
        );
        assert!(engine.fade_to(StripId::One, command, frame(0)));
        assert_eq!(
            engine.levels(StripId::One)[Channel::ColdWhite],
            ChannelLevel {
                color: 200,
                brightness: 3000
            }
        );
    }

    #[test]
    fn test_fade_all_to_black() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        engine.set_to(StripId::One, red_intent(), frame(0));
        engine.set_to(StripId::Two, red_intent(), frame(0));

        let mut dark_at = None;
        for tick in 1..200 {
            if engine.fade_all_to_black(frame(tick)) {
                dark_at = Some(tick);
                break;
            }
        }
        assert!(dark_at.is_some());
        for strip in StripId::ALL {
            for (_, level) in engine.levels(strip).iter() {
                assert_eq!(*level, ChannelLevel::default());
            }
        }
    }
}
