use std::fmt;

/// Errors from parsing a subscription pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("'#' must be the last segment in pattern '{0}'")]
    MultiNotLast(String),

    #[error("wildcard must fill a whole segment in pattern '{0}'")]
    PartialWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Exact(String),
    /// `+`: exactly one level.
    Single,
    /// `#`: any remaining levels, including none.
    Multi,
}

/// MQTT-style topic pattern over `/`-separated state paths.
///
/// - `session/user` matches only itself
/// - `user/+` matches `user/teams`, not `user/teams/x`
/// - `catalog/#` matches `catalog`, `catalog/gear`, `catalog/gear/x`
/// - `#` matches every path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl TopicPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let parts: Vec<&str> = pattern.split('/').collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let seg = match *part {
                "+" => Segment::Single,
                "#" if i + 1 == parts.len() => Segment::Multi,
                "#" => return Err(PatternError::MultiNotLast(pattern.to_string())),
                p if p.contains('+') || p.contains('#') => {
                    return Err(PatternError::PartialWildcard(pattern.to_string()));
                }
                p => Segment::Exact(p.to_string()),
            };
            segments.push(seg);
        }
        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Pattern matching exactly one concrete path.
    pub(crate) fn exact(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path
                .split('/')
                .map(|level| Segment::Exact(level.to_string()))
                .collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a concrete path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let mut levels = path.split('/');
        for seg in &self.segments {
            match seg {
                Segment::Multi => return true,
                Segment::Single => {
                    if levels.next().is_none() {
                        return false;
                    }
                }
                Segment::Exact(want) => match levels.next() {
                    Some(level) if level == want => {}
                    _ => return false,
                },
            }
        }
        levels.next().is_none()
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
