use std::borrow::Cow;

use smallvec::SmallVec;

use super::char_trait::DawgChar;

/// Inline buffer used for words while they are being inserted.
pub type WordBuf<C> = SmallVec<[C; 32]>;

/// Trait for types that can be inserted into a [`Builder`](super::Builder) as a word.
///
/// Implemented for common string and sequence types so that
/// [`Builder::insert`](super::Builder::insert) and
/// [`build_dawg`](super::builder::build_dawg) accept them directly.
pub trait IntoWord<C: DawgChar> {
    /// Collects this word into a label buffer.
    fn collect_word(self) -> WordBuf<C>;
}

impl<C: DawgChar> IntoWord<C> for WordBuf<C> {
    fn collect_word(self) -> WordBuf<C> {
        self
    }
}

impl<C: DawgChar> IntoWord<C> for &[C] {
    fn collect_word(self) -> WordBuf<C> {
        WordBuf::from_slice(self)
    }
}

impl<C: DawgChar> IntoWord<C> for Vec<C> {
    fn collect_word(self) -> WordBuf<C> {
        WordBuf::from_vec(self)
    }
}

impl<C: DawgChar, const N: usize> IntoWord<C> for [C; N] {
    fn collect_word(self) -> WordBuf<C> {
        WordBuf::from_iter(self)
    }
}

// Borrowed sequences go through their slice.
impl<C: DawgChar> IntoWord<C> for &Vec<C> {
    fn collect_word(self) -> WordBuf<C> {
        self.as_slice().collect_word()
    }
}

impl<C: DawgChar, const N: usize> IntoWord<C> for &[C; N] {
    fn collect_word(self) -> WordBuf<C> {
        self.as_slice().collect_word()
    }
}

/// Text is split into `char`s. Implemented per type: a blanket impl over
/// `AsRef<str>` would overlap with the slice impls above.
macro_rules! impl_into_word_for_text {
    ($($text:ty),* $(,)?) => {
        $(
            impl IntoWord<char> for $text {
                fn collect_word(self) -> WordBuf<char> {
                    self.chars().collect()
                }
            }
        )*
    };
}

impl_into_word_for_text!(&str, &&str, String, &String, Box<str>, Cow<'_, str>);

/// Turns one input line into a word by dropping every whitespace character.
///
/// A blank line yields the empty word, which is a valid insertion.
pub fn normalize_line(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}
