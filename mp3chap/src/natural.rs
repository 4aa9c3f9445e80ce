//! Natural ("human") ordering of file names
use std::cmp::Ordering;

/// Compare two strings, treating runs of digits as numbers
///
/// Both strings are split into alternating runs of text and digits, always starting with a
/// (possibly empty) run of text. Text runs compare as plain strings and digit runs by their
/// numeric value, so `track2` sorts before `track10` and `part1` before `part`. Strings that
/// only differ in leading zeros fall back to ordinary string order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = Segments::new(a);
    let mut right = Segments::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match l.cmp(&r) {
                Ordering::Equal => (),
                ordering => return ordering,
            },
        }
    }
}

/// A run of non-digits, or a run of ASCII digits
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Number(&'a str),
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(a), Segment::Number(b)) => {
                let (a, b) = (a.trim_start_matches('0'), b.trim_start_matches('0'));

                // Without leading zeros, a longer run is a bigger number
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }

            // Both sides alternate from a text run, so these never line up
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Segments<'a> {
    rest: &'a str,
    expect_text: bool,
}

impl<'a> Segments<'a> {
    fn new(string: &'a str) -> Self {
        Self {
            rest: string,
            expect_text: true,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let is_text = self.expect_text;
        self.expect_text = !self.expect_text;

        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() == is_text)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;

        Some(if is_text {
            Segment::Text(run)
        } else {
            Segment::Number(run)
        })
    }
}
