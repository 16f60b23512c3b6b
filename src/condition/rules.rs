// SPDX-License-Identifier: MIT

//! Rule library for condition validation
//!
//! Pure data: the denylist of unsafe syntax, the keywords flagged while the
//! author is still typing, the method whitelist and the workflow variable
//! naming rule.
//!
//! All patterns are compiled once. `regex::Regex` keeps no scan position
//! between searches, so sharing the compiled rules across calls and threads
//! cannot make a result depend on earlier calls.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// A denylist entry: a case-insensitive pattern and the reason reported on match
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    message: &'static str,
}

impl Rule {
    fn new(pattern: &str, message: &'static str) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("denylist pattern must compile");
        Self { pattern, message }
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Syntax that is never allowed in an authoritative check, in scan order
const DENYLIST_TABLE: &[(&str, &str)] = &[
    // `=` that is not part of ==, ===, !=, !==, <=, >=. Also catches `=>`.
    (
        r"(?:^|[^=!<>])=(?:[^=]|$)",
        "Condition contains disallowed syntax: assignment operators are not allowed",
    ),
    (
        r"\beval\b",
        "Condition contains disallowed syntax: eval is not allowed",
    ),
    (
        r"\bfunction\b",
        "Condition contains disallowed syntax: function construction is not allowed",
    ),
    (
        r"\b(?:import|require)\b",
        "Condition contains disallowed syntax: module loading is not allowed",
    ),
    (
        r"\bnew\b",
        "Condition contains disallowed syntax: object construction is not allowed",
    ),
    (
        r"\b(?:for|while|do|switch|try|catch|finally|throw|return)\b",
        "Condition contains disallowed syntax: control flow statements are not allowed",
    ),
    (
        r"\bdelete\b",
        "Condition contains disallowed syntax: delete is not allowed",
    ),
    (
        r"\b(?:process|global|globalThis|window|document|this|Reflect)\b",
        "Condition contains disallowed syntax: access to runtime globals is not allowed",
    ),
    (
        r"__proto__|\bconstructor\b|\bprototype\b",
        "Condition contains disallowed syntax: prototype access is not allowed",
    ),
    (
        r"\+\+|--",
        "Condition contains disallowed syntax: increment and decrement operators are not allowed",
    ),
    (
        r"<<|>>",
        "Condition contains disallowed syntax: bitwise shift operators are not allowed",
    ),
    (
        r";",
        "Condition contains disallowed syntax: multiple statements are not allowed",
    ),
    (
        r"[{}]",
        "Condition contains disallowed syntax: object literals are not allowed",
    ),
    (
        r",",
        "Condition contains disallowed syntax: comma expressions are not allowed",
    ),
    (
        r"(?:^|[(!&|=<>+\-*/%?:~^])\s*\[",
        "Condition contains disallowed syntax: array literals are not allowed",
    ),
    (
        r"`",
        "Condition contains disallowed syntax: template literals are not allowed",
    ),
];

/// Compiled denylist, in scan order
pub static DENYLIST: Lazy<Vec<Rule>> = Lazy::new(|| {
    DENYLIST_TABLE
        .iter()
        .map(|(pattern, message)| Rule::new(pattern, message))
        .collect()
});

/// Keywords flagged by the advisory pre-check on raw, unsubstituted text
static PRECHECK_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r"\b(?:eval|function|import|require|process|globalThis|global|window|document|constructor|prototype)\b|__proto__",
    )
    .case_insensitive(true)
    .build()
    .expect("pre-check keyword pattern must compile")
});

/// Methods that only inspect a value: no mutation, no I/O, no reflection
pub const METHOD_WHITELIST: &[&str] = &[
    "includes",
    "startsWith",
    "endsWith",
    "indexOf",
    "lastIndexOf",
    "toLowerCase",
    "toUpperCase",
    "trim",
    "trimStart",
    "trimEnd",
    "charAt",
    "at",
    "substring",
    "slice",
    "toString",
    "toFixed",
];

/// Literal keywords that resolve without a binding
pub const RESERVED_LITERALS: &[&str] = &["true", "false", "null", "undefined"];

static WORKFLOW_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__v\d+$").expect("workflow variable pattern must compile"));

static BRACKET_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,6}$").expect("bracket index pattern must compile"));

/// Quoted bracket keys: no escapes, so the raw text is the property name
static BRACKET_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_ \-]*$").expect("bracket key pattern must compile")
});

/// First denylist rule matching `input`
pub fn first_denylist_match(input: &str) -> Option<&'static Rule> {
    DENYLIST.iter().find(|rule| rule.is_match(input))
}

/// First pre-check keyword found in `input`, as written
pub fn find_precheck_keyword(input: &str) -> Option<&str> {
    PRECHECK_KEYWORDS.find(input).map(|m| m.as_str())
}

/// `__v` followed by one or more digits
pub fn is_workflow_variable(name: &str) -> bool {
    WORKFLOW_VARIABLE.is_match(name)
}

pub fn is_reserved_literal(name: &str) -> bool {
    RESERVED_LITERALS.contains(&name)
}

pub fn is_whitelisted_method(name: &str) -> bool {
    METHOD_WHITELIST.contains(&name)
}

/// Integer literal small enough to be a bracket index
pub fn is_bracket_index(text: &str) -> bool {
    BRACKET_INDEX.is_match(text)
}

/// String contents allowed as a bracket key
pub fn is_bracket_key(text: &str) -> bool {
    BRACKET_KEY.is_match(text)
}
