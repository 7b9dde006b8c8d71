use std::collections::HashMap;
use std::fmt;

use crate::errors::RegistrationError;

/// One pattern segment: a literal to compare, or a named parameter that
/// matches anything and captures its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// Parsed route path pattern, e.g. `/services/{id}`. Literals and named
/// parameters only; no wildcard or catch-all segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RegistrationError> {
        if !pattern.starts_with('/') {
            return Err(RegistrationError::InvalidPattern(format!(
                "pattern must start with '/': {pattern}"
            )));
        }
        let mut segments = Vec::new();
        for seg in pattern.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(RegistrationError::InvalidPattern(format!(
                        "empty parameter name in {pattern}"
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
            } else if seg.contains('{') || seg.contains('}') {
                return Err(RegistrationError::InvalidPattern(format!(
                    "malformed segment `{seg}` in {pattern}"
                )));
            } else {
                segments.push(Segment::Literal(seg.to_string()));
            }
        }
        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match against a request path split into segments, capturing parameter
    /// values. `None` when arity or a literal disagrees.
    pub fn matches(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
            }
        }
        Some(params)
    }

    /// Whether some request path could match both patterns. True when the
    /// arities agree and every pair of corresponding literals agrees.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                _ => true,
            })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
