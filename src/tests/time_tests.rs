#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::Time;

    #[test]
    fn test_play_time_only_accumulates_when_asked() {
        let mut time = Time::new();
        time.update(0.5);
        assert!(time.elapsed_seconds().abs() < f32::EPSILON);

        time.accumulate_play_time();
        time.update(0.25);
        time.accumulate_play_time();
        assert!((time.elapsed_seconds() - 0.75).abs() < f32::EPSILON);

        time.reset();
        assert!(time.elapsed_seconds().abs() < f32::EPSILON);

        // The last frame delta survives a reset
        time.accumulate_play_time();
        assert!((time.elapsed_seconds() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_delta_is_clamped() {
        let mut time = Time::new();
        time.update(-1.0);
        time.accumulate_play_time();
        assert!(time.elapsed_seconds().abs() < f32::EPSILON);
    }
}
