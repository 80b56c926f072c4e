// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caption lookup for photos that arrive with a loosely keyed caption map.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::debug;

/// Resolves the caption for each photo from a map keyed by whatever the
/// caller had at hand: the file name, its stem, or a 1-based position.
#[derive(Debug, Clone, Default)]
pub struct CaptionMatcher {
    captions: HashMap<String, String>,
    /// `None` marks a stem claimed by keys with different captions.
    by_stem: HashMap<String, Option<String>>,
}

impl CaptionMatcher {
    pub fn new(captions: HashMap<String, String>) -> Self {
        let mut by_stem: HashMap<String, Option<String>> = HashMap::new();
        for (key, caption) in &captions {
            match by_stem.entry(stem_key(key)) {
                Entry::Vacant(slot) => {
                    slot.insert(Some(caption.clone()));
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().as_ref() != Some(caption) {
                        debug!(stem = %slot.key(), "Ambiguous caption stem ignored");
                        slot.insert(None);
                    }
                }
            }
        }
        Self { captions, by_stem }
    }

    /// Caption for the photo named `file_name` at 0-based `position`.
    ///
    /// Tries the exact key, then a case-insensitive stem match, then the
    /// positional keys `"N"` and `"photo_N"`. A stem shared by keys with
    /// different captions matches nothing. Blank captions count as absent.
    pub fn caption_for(&self, file_name: &str, position: usize) -> Option<String> {
        let found = self
            .exact(file_name)
            .or_else(|| self.stem(file_name))
            .or_else(|| self.positional(position))?;
        let trimmed = found.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// Captions for an ordered list of file names.
    pub fn resolve_all<S: AsRef<str>>(&self, file_names: &[S]) -> Vec<Option<String>> {
        let resolved: Vec<Option<String>> = file_names
            .iter()
            .enumerate()
            .map(|(i, name)| self.caption_for(name.as_ref(), i))
            .collect();
        debug!(
            photos = file_names.len(),
            matched = resolved.iter().filter(|c| c.is_some()).count(),
            "Captions resolved"
        );
        resolved
    }

    fn exact(&self, file_name: &str) -> Option<&String> {
        self.captions.get(file_name)
    }

    fn stem(&self, file_name: &str) -> Option<&String> {
        self.by_stem.get(&stem_key(file_name))?.as_ref()
    }

    fn positional(&self, position: usize) -> Option<&String> {
        let n = position + 1;
        self.captions
            .get(&n.to_string())
            .or_else(|| self.captions.get(&format!("photo_{n}")))
    }
}

fn stem_key(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pairs: &[(&str, &str)]) -> CaptionMatcher {
        CaptionMatcher::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn exact_key_wins() {
        let m = matcher(&[("IMG_01.jpg", "exact"), ("img_01", "stem")]);
        assert_eq!(m.caption_for("IMG_01.jpg", 0).as_deref(), Some("exact"));
    }

    #[test]
    fn stem_match_ignores_case_and_extension() {
        let m = matcher(&[("Img_02", "Vehicle B")]);
        assert_eq!(m.caption_for("IMG_02.JPEG", 5).as_deref(), Some("Vehicle B"));
    }

    #[test]
    fn positional_fallback() {
        let m = matcher(&[("1", "first"), ("photo_2", "second")]);
        assert_eq!(
            m.resolve_all(&["a.jpg", "b.jpg", "c.jpg"]),
            vec![Some("first".to_owned()), Some("second".to_owned()), None]
        );
    }

    #[test]
    fn conflicting_stems_fall_through_to_position() {
        for _ in 0..16 {
            let m = matcher(&[
                ("IMG_1.jpg", "from jpg"),
                ("img_1.png", "from png"),
                ("3", "third"),
            ]);
            assert_eq!(m.caption_for("IMG_1.jpeg", 2).as_deref(), Some("third"));
            assert_eq!(m.caption_for("IMG_1.jpeg", 0), None);
            // Exact keys are still honoured.
            assert_eq!(m.caption_for("img_1.png", 0).as_deref(), Some("from png"));
        }
    }

    #[test]
    fn stems_sharing_a_caption_still_match() {
        let m = matcher(&[("IMG_7.jpg", "same"), ("img_7.heic", "same")]);
        assert_eq!(m.caption_for("img_7.png", 0).as_deref(), Some("same"));
    }

    #[test]
    fn blank_caption_is_absent() {
        let m = matcher(&[("a.jpg", "   ")]);
        assert_eq!(m.caption_for("a.jpg", 0), None);
    }

    #[test]
    fn empty_map_matches_nothing() {
        assert_eq!(CaptionMatcher::default().caption_for("a.jpg", 0), None);
    }
}
