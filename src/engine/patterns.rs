//! Gitignore-style pattern sets with last-match-wins precedence.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::ops::Add;
use std::path::Path;

use crate::error::{Error, Result};

/// One compiled ignore rule.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    negated: bool,
    matcher: Gitignore,
}

impl Pattern {
    /// Compile a single pattern line. Returns `Ok(None)` for blank lines and comments.
    pub fn compile(line: &str) -> Result<Option<Self>> {
        if is_blank_or_comment(line) {
            return Ok(None);
        }
        let mut builder = GitignoreBuilder::new(".");
        builder.add_line(None, line).map_err(|source| Error::Pattern {
            pattern: line.to_string(),
            source,
        })?;
        let matcher = builder.build().map_err(|source| Error::Pattern {
            pattern: line.to_string(),
            source,
        })?;
        if matcher.is_empty() {
            return Ok(None);
        }
        Ok(Some(Pattern {
            source: line.to_string(),
            negated: line.starts_with('!'),
            matcher,
        }))
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for `!` re-inclusion patterns.
    pub fn negated(&self) -> bool {
        self.negated
    }

    /// Structural match: the path itself, or any of its ancestor directories.
    pub fn matches(&self, rel: &Path, is_dir: bool) -> bool {
        !self.matcher.matched_path_or_any_parents(rel, is_dir).is_none()
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Ordered list of [`Pattern`]s. The last pattern that matches a path decides:
/// plain patterns exclude, negated patterns re-include. No match means included.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// A set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile gitignore-syntax lines in order. Blank lines and `#` comments are dropped.
    /// The first malformed pattern fails the whole compile.
    pub fn compile<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for line in lines {
            if let Some(pattern) = Pattern::compile(line.as_ref())? {
                patterns.push(pattern);
            }
        }
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern can re-include a path.
    pub fn has_negations(&self) -> bool {
        self.patterns.iter().any(Pattern::negated)
    }

    /// Append `other`'s patterns after ours; `other` gets the final say.
    pub fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }

    /// The pattern deciding `rel`, i.e. the last one that matches it.
    /// `rel` must be relative to the project root; rooted paths never match.
    pub fn matched(&self, rel: &Path, is_dir: bool) -> Option<&Pattern> {
        if rel.has_root() || rel.as_os_str().is_empty() {
            return None;
        }
        self.patterns.iter().rev().find(|p| p.matches(rel, is_dir))
    }

    /// True if `rel` is excluded.
    pub fn matches(&self, rel: &Path, is_dir: bool) -> bool {
        self.matched(rel, is_dir).is_some_and(|p| !p.negated())
    }
}

impl Add for PatternSet {
    type Output = PatternSet;

    fn add(mut self, rhs: PatternSet) -> PatternSet {
        self.extend(rhs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(lines: &[&str]) -> PatternSet {
        PatternSet::compile(lines).unwrap()
    }

    #[test]
    fn empty_set_matches_nothing() {
        let s = PatternSet::compile(Vec::<String>::new()).unwrap();
        assert!(s.is_empty());
        assert!(!s.matches(Path::new("a.py"), false));
        assert!(!s.matches(Path::new("a"), true));
    }

    #[test]
    fn comments_and_blanks_are_dropped() {
        let s = set(&["# comment", "", "   ", "*.pyc"]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.patterns()[0].source(), "*.pyc");
    }

    #[test]
    fn glob_matches_at_any_depth() {
        let s = set(&["*.pyc"]);
        assert!(s.matches(Path::new("a.pyc"), false));
        assert!(s.matches(Path::new("pkg/sub/a.pyc"), false));
        assert!(!s.matches(Path::new("pkg/a.py"), false));
    }

    #[test]
    fn directory_pattern_spares_same_named_file() {
        let s = set(&["build/"]);
        assert!(s.matches(Path::new("build"), true));
        assert!(!s.matches(Path::new("build"), false));
        assert!(s.matches(Path::new("build/out.py"), false));
        assert!(s.matches(Path::new("src/build/out.py"), false));
    }

    #[test]
    fn anchored_pattern_only_matches_at_root() {
        let s = set(&["/setup.py"]);
        assert!(s.matches(Path::new("setup.py"), false));
        assert!(!s.matches(Path::new("pkg/setup.py"), false));
    }

    #[test]
    fn double_star_spans_directories() {
        let s = set(&["docs/**/*.py"]);
        assert!(s.matches(Path::new("docs/a/b/c.py"), false));
        assert!(!s.matches(Path::new("src/docs.py"), false));
    }

    #[test]
    fn last_match_wins() {
        let s = set(&["*.py", "!keep.py"]);
        assert!(s.matches(Path::new("drop.py"), false));
        assert!(!s.matches(Path::new("keep.py"), false));

        let s = set(&["!keep.py", "*.py"]);
        assert!(s.matches(Path::new("keep.py"), false));
    }

    #[test]
    fn negation_reincludes_under_excluded_directory() {
        let s = set(&["vendor/"]) + set(&["!vendor/keep.py"]);
        assert!(s.has_negations());
        assert!(!s.matches(Path::new("vendor/keep.py"), false));
        assert!(s.matches(Path::new("vendor/other.py"), false));
        assert_eq!(
            s.matched(Path::new("vendor/keep.py"), false).map(Pattern::source),
            Some("!vendor/keep.py")
        );
    }

    #[test]
    fn concatenation_preserves_order() {
        let s = set(&["a", "b"]) + set(&["c"]);
        let sources: Vec<&str> = s.patterns().iter().map(Pattern::source).collect();
        assert_eq!(sources, vec!["a", "b", "c"]);
    }

    #[test]
    fn rooted_and_empty_paths_never_match() {
        let s = set(&["*"]);
        assert!(!s.matches(Path::new("/abs/a.py"), false));
        assert!(!s.matches(Path::new(""), true));
    }

    #[test]
    fn malformed_pattern_fails_at_compile() {
        let err = PatternSet::compile(["ok.py", "src/[abc"]).unwrap_err();
        match err {
            Error::Pattern { pattern, .. } => assert_eq!(pattern, "src/[abc"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
