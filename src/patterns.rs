//! Rule compilation and pattern sets.
//!
//! A rule is a path relative to the cleaned folder with three kinds of wildcards:
//!
//! - `/**/` matches any number of path segments, including none
//! - `/*/` and a trailing `/*` match exactly one segment
//! - `*` anywhere else matches a run of characters inside one segment
//!
//! Every rule compiles to a single regex anchored at both ends, so it has to match
//! the whole relative path.

use crate::error::PatternError;
use regex::Regex;

/// One unit of a rule while it is being rewritten into a regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    /// Leading half of `/**/`, the closing slash stays a `Char('/')`
    AnySegments,
    /// Leading half of `/*/`, the closing slash stays a `Char('/')`
    OneSegment,
    /// A trailing `/*`
    LastSegment,
    /// A bare `*`
    Star,
}

impl Token {
    fn fragment(self) -> &'static str {
        match self {
            Token::AnySegments => "(?:/.*)?",
            Token::OneSegment | Token::LastSegment => "/[^/]+",
            Token::Star => "[^/]*",
            // Literal characters are escaped in runs by `render`
            Token::Char(_) => "",
        }
    }
}

/// Replace every non-overlapping occurrence of `needle`, scanning left to right.
/// Only literal characters can be part of a match, so earlier rewrites are never
/// touched again.
fn replace_all(tokens: &[Token], needle: &str, replacement: &[Token]) -> Vec<Token> {
    let needle: Vec<Token> = needle.chars().map(Token::Char).collect();
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i..].starts_with(&needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(tokens[i]);
            i += 1;
        }
    }

    out
}

fn render(tokens: &[Token]) -> String {
    let mut pattern = String::from("^");
    let mut literal = String::new();

    for token in tokens {
        match token {
            Token::Char(c) => literal.push(*c),
            other => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(other.fragment());
            }
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');

    pattern
}

/// Translate a rule string into the source of its anchored regex.
pub fn rule_to_regex(rule: &str) -> Result<String, PatternError> {
    if rule.is_empty() {
        return Err(PatternError::Empty);
    }
    if rule.starts_with('/') {
        return Err(PatternError::Absolute(rule.to_string()));
    }

    let tokens: Vec<Token> = rule.chars().map(Token::Char).collect();
    let tokens = replace_all(&tokens, "/**/", &[Token::AnySegments, Token::Char('/')]);
    let mut tokens = replace_all(&tokens, "/*/", &[Token::OneSegment, Token::Char('/')]);

    if tokens.ends_with(&[Token::Char('/'), Token::Char('*')]) {
        tokens.truncate(tokens.len() - 2);
        tokens.push(Token::LastSegment);
    }

    let tokens: Vec<Token> = tokens
        .into_iter()
        .map(|t| match t {
            Token::Char('*') => Token::Star,
            other => other,
        })
        .collect();

    Ok(render(&tokens))
}

/// Compile a rule string into a matcher over relative paths.
pub fn compile(rule: &str) -> Result<Regex, PatternError> {
    let source = rule_to_regex(rule)?;
    Regex::new(&source).map_err(|source| PatternError::Regex {
        rule: rule.to_string(),
        source,
    })
}

/// The compiled rules of one rule category.
///
/// Besides the matcher for each rule, the set keeps one matcher per leading run of
/// segments (`a`, `a/b`, `a/b/c` for the rule `a/b/c`). Those answer whether a
/// directory lies on the way to something a rule protects.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<String>,
    exact: Vec<Regex>,
    prefix: Vec<Regex>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `rule` and add it together with all of its prefixes.
    ///
    /// Either the whole rule is added or, on error, nothing is.
    pub fn add_rule(&mut self, rule: &str) -> Result<(), PatternError> {
        let exact = compile(rule)?;

        let mut prefixes = Vec::new();
        let mut partial = String::new();
        for segment in rule.split('/') {
            if !partial.is_empty() {
                partial.push('/');
            }
            partial.push_str(segment);
            prefixes.push(compile(&partial)?);
        }

        self.rules.push(rule.to_string());
        push_unique(&mut self.exact, exact);
        for prefix in prefixes {
            push_unique(&mut self.prefix, prefix);
        }

        Ok(())
    }

    /// True if any rule matches the whole path
    pub fn matches_exact(&self, path: &str) -> bool {
        self.exact.iter().any(|re| re.is_match(path))
    }

    /// True if the path matches any rule or any rule prefix
    pub fn matches_prefix(&self, path: &str) -> bool {
        self.prefix.iter().any(|re| re.is_match(path))
    }

    /// Rule strings in the order they were added
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn push_unique(matchers: &mut Vec<Regex>, re: Regex) {
    if !matchers.iter().any(|m| m.as_str() == re.as_str()) {
        matchers.push(re);
    }
}
