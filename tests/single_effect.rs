mod common;

mod tests {
    use super::common::{FRAME_MS, frame};
    use rgbcww_composer::color::{BLUE, RED, Rgb};
    use rgbcww_composer::effect::{Phase, PulseStep, RainbowLeg, SingleStep};
    use rgbcww_composer::{
        Channel, FadeEngine, FadeProfile, HighLevelCommand, SingleEffect, SingleStripPlayer,
        StripId, StripIntent,
    };

    fn intent(color: Rgb, brightness: u16, effect: SingleEffect) -> StripIntent {
        StripIntent {
            power: true,
            command: HighLevelCommand {
                color,
                color_brightness: brightness,
                ..HighLevelCommand::default()
            },
            effect,
        }
    }

    fn red_brightness(engine: &FadeEngine, strip: StripId) -> u16 {
        engine.levels(strip)[Channel::Red].brightness
    }

    #[test]
    fn test_triple_pulse_sequence() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let intent = intent(RED, 4095, SingleEffect::TriplePulse);

        let mut steps: Vec<(u64, SingleStep)> = Vec::new();
        let mut brightness: Vec<u16> = Vec::new();
        // 10 seconds
        for tick in 0..910 {
            player.run(StripId::Two, &intent, &mut engine, frame(tick));
            brightness.push(red_brightness(&engine, StripId::Two));
            if steps.last().map(|(_, step)| *step) != Some(player.step()) {
                steps.push((u64::from(tick) * FRAME_MS, player.step()));
            }
        }

        let sequence: Vec<SingleStep> = steps.iter().take(11).map(|(_, step)| *step).collect();
        assert_eq!(
            sequence,
            [
                PulseStep::Base,
                PulseStep::Peak,
                PulseStep::Trough,
                PulseStep::Gap,
                PulseStep::Peak,
                PulseStep::Trough,
                PulseStep::Gap,
                PulseStep::Peak,
                PulseStep::Trough,
                PulseStep::Base,
                PulseStep::Peak,
            ]
            .map(SingleStep::Pulse)
        );

        // Back at the dim glow for at least 1.5 s before the next burst
        let (base_at, _) = steps[9];
        let (next_peak_at, _) = steps[10];
        assert!(next_peak_at - base_at >= 1500, "{base_at} -> {next_peak_at}");

        // Exactly three full-brightness pulses in the first burst
        let burst_end = usize::try_from(base_at / FRAME_MS).unwrap();
        let peaks = brightness[..burst_end]
            .windows(2)
            .filter(|pair| pair[0] != 4095 && pair[1] == 4095)
            .count();
        assert_eq!(peaks, 3);

        let hold_tick = usize::try_from((base_at + 700) / FRAME_MS).unwrap();
        assert_eq!(brightness[hold_tick], 512);
        assert_eq!(player.phase(), Phase::Display);
    }

    #[test]
    fn test_triple_pulse_keeps_whites_dark() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let mut intent = intent(BLUE, 4095, SingleEffect::TriplePulse);
        intent.command.white_brightness = 4095;

        for tick in 0..300 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        let levels = engine.levels(StripId::One);
        assert_eq!(levels[Channel::Blue].color, 255);
        assert_eq!(levels[Channel::Red].color, 0);
        assert_eq!(levels[Channel::ColdWhite].brightness, 0);
        assert_eq!(levels[Channel::WarmWhite].brightness, 0);
    }

    #[test]
    fn test_rainbow_legs() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let intent = intent(BLUE, 2000, SingleEffect::Rainbow);

        for tick in 0..=273 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        // Halfway through the 6 s red leg
        let levels = engine.levels(StripId::One);
        assert_eq!(levels[Channel::Red].color, 128);
        assert_eq!(levels[Channel::Green].color, 0);
        assert_eq!(levels[Channel::Red].brightness, 2000);
        assert_eq!(levels[Channel::Blue].brightness, 2000);
        assert_eq!(player.step(), SingleStep::Rainbow(RainbowLeg::Red));

        for tick in 274..=546 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        assert_eq!(engine.levels(StripId::One)[Channel::Red].color, 255);
        assert_eq!(player.step(), SingleStep::Rainbow(RainbowLeg::Red));

        player.run(StripId::One, &intent, &mut engine, frame(547));
        assert_eq!(player.step(), SingleStep::Rainbow(RainbowLeg::Green));

        // The next leg starts smoothly from full red
        player.run(StripId::One, &intent, &mut engine, frame(548));
        let levels = engine.levels(StripId::One);
        assert!(levels[Channel::Red].color >= 250);
        assert!(levels[Channel::Green].color <= 5);

        for tick in 549..1200 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        assert_eq!(player.step(), SingleStep::Rainbow(RainbowLeg::Blue));
    }

    #[test]
    fn test_none_follows_intent() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let red = intent(RED, 4095, SingleEffect::None);

        for tick in 0..100 {
            player.run(StripId::One, &red, &mut engine, frame(tick));
        }
        assert!(player.is_settled());
        assert_eq!(engine.levels(StripId::One)[Channel::Red].color, 255);

        // A live intent change is followed without another black-out
        let blue = intent(BLUE, 4095, SingleEffect::None);
        for tick in 100..200 {
            player.run(StripId::One, &blue, &mut engine, frame(tick));
            assert_eq!(player.phase(), Phase::Display);
        }
        let levels = engine.levels(StripId::One);
        assert_eq!(levels[Channel::Red].color, 0);
        assert_eq!(levels[Channel::Blue].color, 255);
    }

    #[test]
    fn test_power_off_keeps_effect_state() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let mut intent = intent(RED, 4095, SingleEffect::TriplePulse);

        for tick in 0..250 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        assert_eq!(player.step(), SingleStep::Pulse(PulseStep::Peak));

        intent.power = false;
        for tick in 250..400 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        assert!(player.is_settled());
        assert_eq!(red_brightness(&engine, StripId::One), 0);
        assert_eq!(player.step(), SingleStep::Pulse(PulseStep::Peak));
        assert_eq!(player.effect(), SingleEffect::TriplePulse);
    }

    #[test]
    fn test_effect_change_starts_with_black_out() {
        let mut engine = FadeEngine::new(FadeProfile::DEFAULT);
        let mut player = SingleStripPlayer::new();
        let mut intent = intent(RED, 4095, SingleEffect::TriplePulse);

        for tick in 0..400 {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
        }
        assert!(player.counter() > 0);

        intent.effect = SingleEffect::Rainbow;
        player.run(StripId::One, &intent, &mut engine, frame(400));
        assert_eq!(player.effect(), SingleEffect::Rainbow);
        assert_eq!(player.phase(), Phase::FadeOut);
        assert_eq!(player.counter(), 0);
        assert_eq!(player.step(), SingleStep::Rainbow(RainbowLeg::Red));

        let mut tick = 401;
        while player.phase() == Phase::FadeOut {
            player.run(StripId::One, &intent, &mut engine, frame(tick));
            tick += 1;
            assert!(tick < 600);
        }
        assert_eq!(red_brightness(&engine, StripId::One), 0);
    }
}
