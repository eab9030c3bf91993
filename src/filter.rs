//! Name-prefix filter engine (§4.2). A filter spec `t1[/t2]…` parses into an
//! ordered list of `(needle, allow)` rules; the first rule whose needle is
//! `"*"` or a literal prefix of the message name decides the outcome.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub needle: String,
    pub allow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    rules: Vec<FilterRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    EmptyToken(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::EmptyToken(spec) => {
                write!(f, "filter spec '{spec}' contains an empty token")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl Filter {
    /// An empty spec yields an empty rule list, which passes everything —
    /// this is also the representation used when `FR=`/`FW=` is absent.
    pub fn parse(spec: &str) -> Result<Filter, FilterError> {
        if spec.is_empty() {
            return Ok(Filter { rules: Vec::new() });
        }
        let mut rules = Vec::new();
        for token in spec.split('/') {
            if token.is_empty() {
                return Err(FilterError::EmptyToken(spec.to_owned()));
            }
            let (needle, allow) = match token.strip_prefix('!') {
                Some(rest) => (rest, false),
                None => (token, true),
            };
            if needle.is_empty() {
                return Err(FilterError::EmptyToken(spec.to_owned()));
            }
            rules.push(FilterRule {
                needle: needle.to_owned(),
                allow,
            });
        }
        Ok(Filter { rules })
    }

    pub fn pass(&self, name: &str) -> bool {
        for rule in &self.rules {
            if rule.needle == "*" || name.starts_with(rule.needle.as_str()) {
                return rule.allow;
            }
        }
        self.rules.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reconstruct the spec string this filter would have been parsed from.
    pub fn to_spec_string(&self) -> String {
        self.rules
            .iter()
            .map(|r| {
                if r.allow {
                    r.needle.clone()
                } else {
                    format!("!{}", r.needle)
                }
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Swap every rule's `allow`, per the inversion law in §8.
    pub fn inverted(&self) -> Filter {
        Filter {
            rules: self
                .rules
                .iter()
                .map(|r| FilterRule {
                    needle: r.needle.clone(),
                    allow: !r.allow,
                })
                .collect(),
        }
    }
}
