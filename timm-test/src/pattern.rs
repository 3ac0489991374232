//! A textual description of a status table.

/// Pattern
///
/// A sequence of blocks, each either free (`.`) or reserved (`#`), such as `"##..#..."`.
///
/// Whitespace is ignored, to allow grouping: `"#### ...."`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern(Vec<bool>);

impl Pattern {
    /// Parses a pattern.
    ///
    /// #   Panics
    ///
    /// If the pattern contains any character other than `.`, `#`, or whitespace.
    pub fn parse(pattern: &str) -> Self {
        let reserved = pattern.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => false,
                '#' => true,
                _ => panic!("Unexpected {:?} in pattern {:?}", c, pattern),
            })
            .collect();

        Self(reserved)
    }

    /// Renders a sequence of blocks, `true` meaning reserved, as a pattern.
    pub fn render<I>(reserved: I) -> String
        where
            I: IntoIterator<Item = bool>,
    {
        reserved.into_iter().map(|r| if r { '#' } else { '.' }).collect()
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns whether there is no block.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns whether the block at `index` is reserved.
    pub fn is_reserved(&self, index: usize) -> bool { self.0[index] }

    /// Returns the indexes of the reserved blocks.
    pub fn reserved(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, r)| **r).map(|(i, _)| i)
    }

    /// Returns the indexes of the free blocks.
    pub fn free(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, r)| !**r).map(|(i, _)| i)
    }

    /// Returns the lengths of the runs of free blocks, in order.
    pub fn free_runs(&self) -> Vec<usize> {
        self.0.split(|r| *r).map(|run| run.len()).filter(|len| *len > 0).collect()
    }
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn pattern_parse() {
    let pattern = Pattern::parse("#.. #");

    assert_eq!(4, pattern.len());
    assert!(pattern.is_reserved(0));
    assert!(!pattern.is_reserved(1));
    assert_eq!(vec!(0, 3), pattern.reserved().collect::<Vec<_>>());
    assert_eq!(vec!(1, 2), pattern.free().collect::<Vec<_>>());
}

#[test]
#[should_panic]
fn pattern_parse_invalid() {
    Pattern::parse("#.x");
}

#[test]
fn pattern_render() {
    assert_eq!("", Pattern::render(vec!()));
    assert_eq!("#..#", Pattern::render(vec!(true, false, false, true)));
}

#[test]
fn pattern_free_runs() {
    assert_eq!(vec!(3, 5, 2), Pattern::parse("#...#.....#..#").free_runs());
    assert_eq!(vec!(4), Pattern::parse("....").free_runs());
    assert_eq!(Vec::<usize>::new(), Pattern::parse("##").free_runs());
}

} // mod tests
