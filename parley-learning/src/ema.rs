//! Bounded exponential moving average.

/// Feedback signal: 1.0 for an acceptance, 0.0 for a rejection.
pub fn signal(accepted: bool) -> f64 {
    if accepted {
        1.0
    } else {
        0.0
    }
}

/// One update: `clamp(old * (1 - lr) + signal * lr, 0, 1)`.
pub fn ema_step(old: f64, signal: f64, learning_rate: f64) -> f64 {
    let lr = learning_rate.clamp(0.0, 1.0);
    (old * (1.0 - lr) + signal * lr).clamp(0.0, 1.0)
}

/// Value after `n` identical updates from `initial`:
/// `signal + (initial - signal) * (1 - lr)^n`.
pub fn ema_closed_form(initial: f64, signal: f64, learning_rate: f64, n: u32) -> f64 {
    let lr = learning_rate.clamp(0.0, 1.0);
    let decay = (1.0 - lr).powi(n as i32);
    (signal + (initial - signal) * decay).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_toward_signal() {
        assert!((ema_step(0.7, 1.0, 0.05) - 0.715).abs() < 1e-12);
        assert!((ema_step(0.7, 0.0, 0.05) - 0.665).abs() < 1e-12);
    }

    #[test]
    fn step_is_clamped() {
        assert_eq!(ema_step(1.4, 1.0, 0.5), 1.0);
        assert_eq!(ema_step(-0.2, 0.0, 0.5), 0.0);
    }

    #[test]
    fn closed_form_with_zero_steps_is_identity() {
        assert_eq!(ema_closed_form(0.3, 1.0, 0.05, 0), 0.3);
    }
}
