//! Syllable composition: IPA words → voicebank syllable tokens.
//!
//! A single left-to-right scan per word with one symbol of lookahead. At each
//! position the alternatives below are tried in order and the first that
//! applies emits one token:
//!
//! 1. a digit or capital letter, passed through as its own sample
//! 2. `ʃ` → `si`, `tʃ` → `ti`
//! 3. consonant followed by consonant → consonant + `u` (second one is kept)
//! 4. consonant + vowel
//! 5. lone consonant → `to`/`do` for t/d, `nn` for n, otherwise consonant + `u`
//! 6. bare vowel
//!
//! A trailing length mark after any syllable is skipped.

use std::fmt;

use super::classifier::{consonant_at, match_literal, normalize, vowel_at, Match, LONG_MARK};

/// One voicebank token, e.g. `ka`, `nn`, `7` or `Q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Syllable(String);

impl Syllable {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The syllables of one whitespace/hyphen separated word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    pub syllables: Vec<Syllable>,
}

impl Word {
    pub fn tokens(&self) -> Vec<&str> {
        self.syllables.iter().map(Syllable::as_str).collect()
    }
}

/// A transliterated line: words in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utterance {
    pub words: Vec<Word>,
}

impl Utterance {
    pub fn tokens(&self) -> Vec<Vec<&str>> {
        self.words.iter().map(Word::tokens).collect()
    }

    pub fn syllable_count(&self) -> usize {
        self.words.iter().map(|w| w.syllables.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.syllable_count() == 0
    }
}

/// Words joined by spaces, each word's syllables run together (`harou warudo`).
impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for syllable in &word.syllables {
                f.write_str(syllable.as_str())?;
            }
        }
        Ok(())
    }
}

/// No syllable could start at `index`.
///
/// `index` is a zero-based character offset into the normalized IPA string
/// (the input with ignored combining marks removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unexpected {found} at index {index}")]
pub struct ParseError {
    pub found: char,
    pub index: usize,
}

fn word_end(consonant: char) -> String {
    match consonant {
        't' | 'd' => format!("{consonant}o"),
        'n' => "nn".to_string(),
        _ => format!("{consonant}u"),
    }
}

/// Length of the vowel at `pos` that swallows a preceding glide, if any.
///
/// Only a real vowel with the glide's letter does; a second glide does not.
fn absorbing_vowel(word: &[char], pos: usize, vowel: Match) -> Option<usize> {
    if !vowel.glide {
        return None;
    }
    vowel_at(word, pos)
        .filter(|next| !next.glide && next.letter == vowel.letter)
        .map(|next| next.len)
}

fn is_literal(ch: char) -> bool {
    ch.is_ascii_digit() || ch.is_ascii_uppercase()
}

/// Compose one word. `offset` is the word's position in the whole input,
/// used only for error reporting.
pub fn parse_word(word: &[char], offset: usize) -> Result<Word, ParseError> {
    let mut syllables = Vec::new();
    let mut pos = 0;

    while pos < word.len() {
        let ch = word[pos];

        let token = if is_literal(ch) {
            pos += 1;
            ch.to_string()
        } else if let Some(len) = match_literal(word, pos, "ʃ") {
            pos += len;
            "si".to_string()
        } else if let Some(len) = match_literal(word, pos, "tʃ") {
            pos += len;
            "ti".to_string()
        } else if let Some(cons) = consonant_at(word, pos) {
            let next = pos + cons.len;
            if consonant_at(word, next).is_some() {
                pos = next;
                format!("{}u", cons.letter)
            } else if let Some(vowel) = vowel_at(word, next) {
                pos = next + vowel.len;
                // kji/bwu: the glide melts into the vowel after it
                if let Some(len) = absorbing_vowel(word, pos, vowel) {
                    pos += len;
                }
                format!("{}{}", cons.letter, vowel.letter)
            } else {
                pos = next;
                word_end(cons.letter)
            }
        } else if let Some(vowel) = vowel_at(word, pos) {
            pos += vowel.len;
            // ji/wu: the glide melts into the vowel after it
            if absorbing_vowel(word, pos, vowel).is_some() {
                continue;
            }
            vowel.letter.to_string()
        } else {
            return Err(ParseError {
                found: ch,
                index: offset + pos,
            });
        };

        syllables.push(Syllable(token));
        if word.get(pos) == Some(&LONG_MARK) {
            pos += 1;
        }
    }

    Ok(Word { syllables })
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || ch == '-'
}

/// Split on runs of whitespace and hyphens, yielding `(offset, word)` pairs.
///
/// Runs of delimiters count as one; no empty words are produced.
pub fn split_words(input: &[char]) -> Vec<(usize, &[char])> {
    let mut words = Vec::new();
    let mut start = None;

    for (i, &ch) in input.iter().enumerate() {
        match (is_delimiter(ch), start) {
            (true, Some(s)) => {
                words.push((s, &input[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((s, &input[s..]));
    }

    words
}

/// Transliterate a full IPA line into an [`Utterance`].
pub fn parse_phonemes(ipa: &str) -> Result<Utterance, ParseError> {
    let normalized: Vec<char> = normalize(ipa).chars().collect();

    let words = split_words(&normalized)
        .into_iter()
        .map(|(offset, word)| parse_word(word, offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Utterance { words })
}
