use rand::Rng;

use envdb_core::BackoffConfig;

/// `base_ms` plus a random jitter of up to `jitter_percent` percent of it.
#[must_use]
pub fn jitter_wait(base_ms: u64, jitter_percent: u8) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

/// Base delay before retry number `retry` (1-based), before jitter.
pub(crate) fn base_delay_ms(cfg: &BackoffConfig, retry: u32) -> u64 {
    let factor = u64::from(cfg.factor.max(1));
    let mut delay = cfg.min_backoff_ms;
    for _ in 1..retry {
        delay = delay.saturating_mul(factor);
        if delay >= cfg.max_backoff_ms {
            break;
        }
    }
    delay.min(cfg.max_backoff_ms.max(cfg.min_backoff_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_in_range() {
        for _ in 0..100 {
            let w = jitter_wait(200, 20);
            assert!((200..240).contains(&w));
        }
        assert_eq!(jitter_wait(200, 0), 200);
    }

    #[test]
    fn delay_grows_then_caps() {
        let cfg = BackoffConfig::default();
        let delays: Vec<u64> = (1..=7).map(|r| base_delay_ms(&cfg, r)).collect();
        assert_eq!(delays, [200, 400, 800, 1_600, 3_200, 5_000, 5_000]);
    }
}
