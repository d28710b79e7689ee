//! Structured stylesheet model
//!
//! Generated CSS is built as rules and declarations and only serialized at
//! the end, so `!important` markers are set per declaration instead of being
//! patched into text afterwards. A small parser (rules, nested at-rule blocks
//! and block-less statements) lets user-supplied CSS go through the same path.

use std::fmt;

const IMPORTANT: &str = "!important";

/// One `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// A selector (or at-rule keyword such as `@font-face`) with its declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Comment lines emitted above the rule
    pub comments: Vec<String>,
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            comments: Vec::new(),
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text.into());
        self
    }

    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(property, value));
        self
    }

    pub fn declare_important(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(property, value).important());
        self
    }
}

/// Top-level entry of a stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Rule(Rule),
    /// At-rule wrapping further items (`@media print { ... }`)
    Block { prelude: String, items: Vec<Item> },
    /// Statement without a block (`@import url(x)`), kept as written
    Statement(String),
}

/// Ordered list of rules and at-rule blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub items: Vec<Item>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.items.push(Item::Rule(rule));
    }

    /// Every rule, including those nested in at-rule blocks
    pub fn rules(&self) -> Vec<&Rule> {
        let mut out = Vec::new();
        collect_rules(&self.items, &mut out);
        out
    }

    /// Set the important flag on every declaration, at any nesting depth.
    /// Declarations that already carry it are left untouched, so the marker
    /// is never duplicated.
    pub fn mark_important(&mut self) {
        mark_items(&mut self.items);
    }

    /// Parse a stylesheet of `selector { prop: value; ... }` rules,
    /// at-rule blocks nesting further rules (`@media`, `@supports`) and
    /// block-less statements (`@import ...;`).
    ///
    /// Returns `None` for unbalanced braces, declarations without a colon or
    /// stray text. Comments are dropped.
    pub fn parse(text: &str) -> Option<Self> {
        let text = strip_comments(text);
        Some(Self {
            items: parse_items(&text)?,
        })
    }
}

fn collect_rules<'a>(items: &'a [Item], out: &mut Vec<&'a Rule>) {
    for item in items {
        match item {
            Item::Rule(rule) => out.push(rule),
            Item::Block { items, .. } => collect_rules(items, out),
            Item::Statement(_) => {}
        }
    }
}

fn mark_items(items: &mut [Item]) {
    for item in items {
        match item {
            Item::Rule(rule) => {
                for declaration in &mut rule.declarations {
                    declaration.important = true;
                }
            }
            Item::Block { items, .. } => mark_items(items),
            Item::Statement(_) => {}
        }
    }
}

fn parse_items(text: &str) -> Option<Vec<Item>> {
    let mut items = Vec::new();
    let mut rest = text;

    loop {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }

        let open = find_unquoted(trimmed, '{');
        let semi = find_unquoted(trimmed, ';');
        if let Some(semi) = semi.filter(|&semi| open.is_none_or(|open| semi < open)) {
            let statement = trimmed[..semi].trim();
            if !statement.starts_with('@') {
                return None;
            }
            items.push(Item::Statement(statement.to_string()));
            rest = &trimmed[semi + 1..];
            continue;
        }

        let open = open?;
        let prelude = trimmed[..open].trim();
        if prelude.is_empty() || prelude.contains('}') {
            return None;
        }

        let body_start = open + 1;
        let close = body_start + find_block_end(&trimmed[body_start..])?;
        let body = &trimmed[body_start..close];

        if find_unquoted(body, '{').is_some() {
            items.push(Item::Block {
                prelude: prelude.to_string(),
                items: parse_items(body)?,
            });
        } else {
            let mut rule = Rule::new(prelude);
            for statement in split_statements(body) {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }
                rule.declarations.push(parse_declaration(statement)?);
            }
            items.push(Item::Rule(rule));
        }

        rest = &trimmed[close + 1..];
    }

    Some(items)
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.important {
            write!(f, "{}: {} {};", self.property, self.value, IMPORTANT)
        } else {
            write!(f, "{}: {};", self.property, self.value)
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            writeln!(f, "/* {} */", comment)?;
        }
        writeln!(f, "{} {{", self.selector)?;
        for declaration in &self.declarations {
            writeln!(f, "    {}", declaration)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Rule(rule) => write!(f, "{}", rule),
            Item::Block { prelude, items } => {
                writeln!(f, "{} {{", prelude)?;
                for item in items {
                    for line in item.to_string().lines() {
                        writeln!(f, "    {}", line)?;
                    }
                }
                write!(f, "}}")
            }
            Item::Statement(statement) => write!(f, "{};", statement),
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Quote a family name for use in `font-family` and variable values
pub fn quote_family(family: &str) -> String {
    format!("'{}'", family.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn parse_declaration(statement: &str) -> Option<Declaration> {
    let colon = statement.find(':')?;
    let property = statement[..colon].trim();
    if property.is_empty() {
        return None;
    }
    let mut value = statement[colon + 1..].trim();
    let mut important = false;

    // Accept "!important" and "! important" in any case
    if let Some(bang) = value.rfind('!') {
        let marker: String = value[bang + 1..].chars().filter(|c| !c.is_whitespace()).collect();
        if marker.eq_ignore_ascii_case("important") {
            important = true;
            value = value[..bang].trim_end();
        }
    }

    Some(Declaration {
        property: property.to_string(),
        value: value.to_string(),
        important,
    })
}

/// Split a declaration block on `;`, ignoring separators inside quotes or
/// parentheses (data URIs contain `;base64,`)
fn split_statements(body: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                statements.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    statements.push(&body[start..]);
    statements
}

/// Offset of the `}` closing a block whose `{` precedes `text`
fn find_block_end(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn find_unquoted(text: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == target => return Some(i),
            None => {}
        }
    }
    None
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
