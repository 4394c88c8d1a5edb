//! IPA → canonical letter classification.
//!
//! Two priority-ordered rule tables, one for vowels and one for consonants.
//! At a given position the first rule whose pattern matches wins. Patterns
//! that are a prefix of a longer pattern always come after it.
//!
//! `j` and `w` appear in both tables. The consonant entry is guarded by a
//! one-symbol lookahead into the vowel table; when the guard fails the
//! symbol falls through to its vowel entry (`j` → `i`, `w` → `u`).

/// Combining marks that carry no meaning for the syllabary and are removed
/// before classification: vertical line below, inverted breve below and
/// double inverted breve.
pub const IGNORED_COMBINERS: [char; 3] = ['\u{0329}', '\u{032F}', '\u{0361}'];

/// IPA length mark, consumed after a syllable without effect.
pub const LONG_MARK: char = 'ː';

/// One classified span of IPA input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Canonical letter (`a i u e o` or a consonant letter)
    pub letter: char,
    /// Number of input symbols the pattern covers
    pub len: usize,
    /// True if this was `j`/`w` falling through to the vowel table
    pub glide: bool,
}

struct VowelRule {
    pattern: &'static str,
    letter: char,
    glide: bool,
}

const fn v(pattern: &'static str, letter: char) -> VowelRule {
    VowelRule {
        pattern,
        letter,
        glide: false,
    }
}

const fn glide(pattern: &'static str, letter: char) -> VowelRule {
    VowelRule {
        pattern,
        letter,
        glide: true,
    }
}

const VOWEL_RULES: &[VowelRule] = &[
    v("ɒː", 'a'),
    v("əɹ", 'a'),
    v("eɪ", 'e'),
    v("əʊ", 'o'),
    v("æ", 'a'),
    v("a", 'a'),
    v("ɑ", 'a'),
    v("ʌ", 'a'),
    v("ɜ", 'a'),
    v("ə", 'a'),
    v("i", 'i'),
    glide("j", 'i'),
    v("ɪ", 'i'),
    v("u", 'u'),
    v("ʊ", 'u'),
    glide("w", 'u'),
    v("e", 'e'),
    v("ɛ", 'e'),
    v("ɒ", 'o'),
    v("ɔ", 'o'),
    v("o", 'o'),
];

/// Lookahead a consonant rule needs before it may match.
#[derive(Clone, Copy)]
enum Guard {
    Always,
    /// The next symbol must classify as a vowel in this set.
    BeforeVowel(&'static str),
}

struct ConsonantRule {
    pattern: &'static str,
    letter: char,
    guard: Guard,
}

const fn c(pattern: &'static str, letter: char) -> ConsonantRule {
    ConsonantRule {
        pattern,
        letter,
        guard: Guard::Always,
    }
}

const CONSONANT_RULES: &[ConsonantRule] = &[
    c("k", 'k'),
    c("s", 's'),
    c("θ", 's'),
    c("t", 't'),
    c("n", 'n'),
    c("ŋ", 'n'),
    c("h", 'h'),
    c("f", 'h'),
    c("m", 'm'),
    ConsonantRule {
        pattern: "j",
        letter: 'y',
        guard: Guard::BeforeVowel("auo"),
    },
    c("r", 'r'),
    c("ɹ", 'r'),
    c("l", 'r'),
    // no "wo": w before anything but a is a vowel
    ConsonantRule {
        pattern: "w",
        letter: 'w',
        guard: Guard::BeforeVowel("a"),
    },
    c("g", 'g'),
    c("ɡ", 'g'),
    c("z", 'z'),
    c("ð", 'z'),
    c("dʒ", 'z'),
    c("ʒ", 'z'),
    c("d", 'd'),
    c("b", 'b'),
    c("v", 'b'),
    c("p", 'p'),
];

/// Length of `pattern` if it occurs in `input` starting at `pos`.
pub(crate) fn match_literal(input: &[char], pos: usize, pattern: &str) -> Option<usize> {
    let mut len = 0;
    for expected in pattern.chars() {
        if input.get(pos + len) != Some(&expected) {
            return None;
        }
        len += 1;
    }
    Some(len)
}

/// Classify the vowel starting at `pos`, if any.
pub fn vowel_at(input: &[char], pos: usize) -> Option<Match> {
    VOWEL_RULES.iter().find_map(|rule| {
        match_literal(input, pos, rule.pattern).map(|len| Match {
            letter: rule.letter,
            len,
            glide: rule.glide,
        })
    })
}

/// Classify the consonant starting at `pos`, if any.
///
/// Guarded rules peek at the following symbol without consuming it.
pub fn consonant_at(input: &[char], pos: usize) -> Option<Match> {
    CONSONANT_RULES.iter().find_map(|rule| {
        let len = match_literal(input, pos, rule.pattern)?;
        let allowed = match rule.guard {
            Guard::Always => true,
            Guard::BeforeVowel(set) => {
                vowel_at(input, pos + len).is_some_and(|next| set.contains(next.letter))
            }
        };
        allowed.then_some(Match {
            letter: rule.letter,
            len,
            glide: false,
        })
    })
}

/// Strip the combining marks in [`IGNORED_COMBINERS`].
pub fn normalize(ipa: &str) -> String {
    ipa.chars()
        .filter(|ch| !IGNORED_COMBINERS.contains(ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn vowel(s: &str) -> Option<(char, usize)> {
        vowel_at(&chars(s), 0).map(|m| (m.letter, m.len))
    }

    fn consonant(s: &str) -> Option<(char, usize)> {
        consonant_at(&chars(s), 0).map(|m| (m.letter, m.len))
    }

    #[test]
    fn vowels_collapse_onto_five_letters() {
        for (ipa, letter) in [
            ("æ", 'a'),
            ("ɑ", 'a'),
            ("ʌ", 'a'),
            ("ɜ", 'a'),
            ("ə", 'a'),
            ("ɪ", 'i'),
            ("ʊ", 'u'),
            ("ɛ", 'e'),
            ("ɒ", 'o'),
            ("ɔ", 'o'),
            ("o", 'o'),
        ] {
            assert_eq!(vowel(ipa), Some((letter, 1)), "{ipa}");
        }
    }

    #[test]
    fn longer_vowel_patterns_win() {
        assert_eq!(vowel("ɒː"), Some(('a', 2)));
        assert_eq!(vowel("əɹ"), Some(('a', 2)));
        assert_eq!(vowel("eɪ"), Some(('e', 2)));
        assert_eq!(vowel("əʊ"), Some(('o', 2)));
        // plain ɒ is still o
        assert_eq!(vowel("ɒ"), Some(('o', 1)));
    }

    #[test]
    fn consonants_collapse() {
        for (ipa, letter) in [
            ("θ", 's'),
            ("f", 'h'),
            ("ŋ", 'n'),
            ("ð", 'z'),
            ("ʒ", 'z'),
            ("v", 'b'),
            ("ɹ", 'r'),
            ("l", 'r'),
            ("g", 'g'),
            ("ɡ", 'g'),
        ] {
            assert_eq!(consonant(ipa), Some((letter, 1)), "{ipa}");
        }
        assert_eq!(consonant("dʒ"), Some(('z', 2)));
        assert_eq!(consonant("d"), Some(('d', 1)));
    }

    #[test]
    fn j_is_a_consonant_only_before_a_u_o() {
        assert_eq!(consonant("ja"), Some(('y', 1)));
        assert_eq!(consonant("ju"), Some(('y', 1)));
        assert_eq!(consonant("jəʊ"), Some(('y', 1)));
        assert_eq!(consonant("ji"), None);
        assert_eq!(consonant("je"), None);
        assert_eq!(consonant("j"), None);

        let fallback = vowel_at(&chars("ji"), 0).unwrap();
        assert_eq!(fallback.letter, 'i');
        assert!(fallback.glide);
    }

    #[test]
    fn w_is_a_consonant_only_before_a() {
        assert_eq!(consonant("wæ"), Some(('w', 1)));
        assert_eq!(consonant("wo"), None);
        assert_eq!(consonant("wɪ"), None);
        assert_eq!(vowel("wo"), Some(('u', 1)));
    }

    #[test]
    fn lookahead_does_not_consume() {
        let m = consonant_at(&chars("ja"), 0).unwrap();
        assert_eq!(m.len, 1);
    }

    #[test]
    fn unknown_symbols_do_not_classify() {
        for ipa in ["x", "ʔ", "ˈ", "ʃ", "A", "3", "ː"] {
            assert_eq!(vowel(ipa), None, "{ipa}");
            assert_eq!(consonant(ipa), None, "{ipa}");
        }
    }

    #[test]
    fn normalize_drops_only_ignored_combiners() {
        assert_eq!(normalize("t\u{0361}ʃa\u{032F}n\u{0329}"), "tʃan");
        assert_eq!(normalize("ɒːə"), "ɒːə");
    }
}
