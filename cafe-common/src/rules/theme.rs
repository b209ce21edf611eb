//! Per-theme occurrence counting

use crate::types::CafeTheme;
use serde::{Deserialize, Serialize};

/// Occurrence count per theme plus the currently leading theme
///
/// `counts` is indexed by [`CafeTheme::ordinal`]. The current theme is the
/// most frequently declared one; ties go to the earlier theme in
/// [`CafeTheme::ALL`]. It stays `None` until a review declares a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CafeThemeAggregate {
    pub counts: [i64; 8],
    pub current_theme: Option<CafeTheme>,
}

impl CafeThemeAggregate {
    /// Count one declaration of `theme` and recompute the current theme
    pub fn record(&self, theme: CafeTheme) -> Self {
        let mut next = *self;
        let slot = &mut next.counts[theme.ordinal()];
        *slot = slot.saturating_add(1);
        next.current_theme = leading_theme(&next.counts);
        next
    }

    pub fn count(&self, theme: CafeTheme) -> i64 {
        self.counts[theme.ordinal()]
    }
}

fn leading_theme(counts: &[i64; 8]) -> Option<CafeTheme> {
    let mut leader: Option<(CafeTheme, i64)> = None;
    for theme in CafeTheme::ALL {
        let count = counts[theme.ordinal()];
        if count > 0 && leader.map_or(true, |(_, best)| count > best) {
            leader = Some((theme, count));
        }
    }
    leader.map(|(theme, _)| theme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_declarations_no_theme() {
        assert_eq!(CafeThemeAggregate::default().current_theme, None);
    }

    #[test]
    fn test_most_frequent_theme_leads() {
        let themes = CafeThemeAggregate::default()
            .record(CafeTheme::Study)
            .record(CafeTheme::Pet)
            .record(CafeTheme::Pet);

        assert_eq!(themes.count(CafeTheme::Pet), 2);
        assert_eq!(themes.count(CafeTheme::Study), 1);
        assert_eq!(themes.current_theme, Some(CafeTheme::Pet));
    }

    #[test]
    fn test_tie_goes_to_earlier_theme() {
        let themes = CafeThemeAggregate::default()
            .record(CafeTheme::Kids)
            .record(CafeTheme::Vibe);
        assert_eq!(themes.current_theme, Some(CafeTheme::Vibe));
    }
}
