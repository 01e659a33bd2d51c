//! Equalizer bar markup and its per-bar animation CSS.

use std::fmt::Write;

use rand::Rng;

use crate::cache::BoundedCache;

/// Horizontal distance between bars, in px.
const BAR_SPACING: u32 = 4;
const ANIMATION_MS: std::ops::RangeInclusive<u32> = 350..=500;

/// Generates bar CSS, memoized per bar count so a widget keeps the same
/// animation between requests.
#[derive(Debug)]
pub struct BarStyles {
    cache: BoundedCache<u32, String>,
}

impl BarStyles {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: BoundedCache::new(capacity),
        }
    }

    pub fn css(&self, num_bars: u32) -> String {
        self.cache.get_or_insert_with(num_bars, || generate_css(num_bars))
    }
}

pub fn generate_css(num_bars: u32) -> String {
    let mut rng = rand::rng();
    let mut css = String::new();
    for i in 1..=num_bars {
        let left = 1 + BAR_SPACING * (i - 1);
        let anim = rng.random_range(ANIMATION_MS);
        let _ = write!(
            css,
            ".bar:nth-child({i})  {{ left: {left}px; animation-duration: {anim}ms; }}"
        );
    }
    css
}

pub fn bar_markup(num_bars: u32) -> String {
    "<div class='bar'></div>".repeat(num_bars as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_positions_and_durations() {
        let css = generate_css(3);
        assert!(css.starts_with(".bar:nth-child(1)  { left: 1px; animation-duration: "));
        assert!(css.contains(".bar:nth-child(2)  { left: 5px;"));
        assert!(css.contains(".bar:nth-child(3)  { left: 9px;"));

        for rule in css.split("ms; }").filter(|r| !r.is_empty()) {
            let ms: u32 = rule.rsplit(' ').next().unwrap().parse().unwrap();
            assert!((350..=500).contains(&ms), "{ms} out of range");
        }
    }

    #[test]
    fn test_css_is_memoized() {
        let styles = BarStyles::new(4);
        assert_eq!(styles.css(75), styles.css(75));
        assert_eq!(bar_markup(2), "<div class='bar'></div><div class='bar'></div>");
    }
}
