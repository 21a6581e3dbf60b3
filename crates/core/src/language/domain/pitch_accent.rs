use crate::shared::provider_error::ProviderError;

use super::kana;

const OVERLINE_OPEN: &str = "<span style=\"text-decoration: overline;\">";
const OVERLINE_CLOSE: &str = "</span>";
const DOWNSTEP_MARK: char = 'ꜜ';
const ENTRY_SEPARATOR: &str = "<br>";

/// One accent pattern: the mora after which pitch drops (0 = no drop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchAccentEntry {
    pub headword: String,
    pub reading: String,
    pub downstep: usize,
}

/// Domain interface for pitch-accent lookup.
pub trait PitchAccentStore: Send + Sync {
    fn lookup(&self, headword: &str, reading: &str) -> Result<Vec<PitchAccentEntry>, ProviderError>;

    fn format_as_markup(&self, entries: &[PitchAccentEntry]) -> String {
        render_markup(entries)
    }
}

/// Renders entries as HTML, one line per distinct (reading, pattern).
///
/// High morae are overlined, the drop is marked with `ꜜ` and the pattern
/// number follows in brackets: `<span ..>よ</span>ꜜむ [1]`.
pub fn render_markup(entries: &[PitchAccentEntry]) -> String {
    let mut seen: Vec<(&str, usize)> = Vec::new();
    let mut lines = Vec::new();
    for entry in entries {
        let key = (entry.reading.as_str(), entry.downstep);
        if entry.reading.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        lines.push(render_entry(&entry.reading, entry.downstep));
    }
    lines.join(ENTRY_SEPARATOR)
}

fn render_entry(reading: &str, downstep: usize) -> String {
    let morae = kana::morae(reading);
    let count = morae.len();
    let nucleus = downstep.min(count);

    let mut out = String::new();
    let mut in_high = false;
    for (i, mora) in morae.iter().enumerate() {
        let position = i + 1;
        let high = match nucleus {
            0 => position > 1 || count == 1,
            1 => position == 1,
            n => position > 1 && position <= n,
        };
        if high && !in_high {
            out.push_str(OVERLINE_OPEN);
            in_high = true;
        } else if !high && in_high {
            out.push_str(OVERLINE_CLOSE);
            in_high = false;
        }
        out.push_str(mora);
        if nucleus > 0 && position == nucleus {
            if in_high {
                out.push_str(OVERLINE_CLOSE);
                in_high = false;
            }
            out.push(DOWNSTEP_MARK);
        }
    }
    if in_high {
        out.push_str(OVERLINE_CLOSE);
    }
    out.push_str(&format!(" [{downstep}]"));
    out
}
