use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Asc
    }
}

impl Direction {
    pub fn flip(self) -> Self {
        use Direction::*;
        match self {
            Asc => Desc,
            Desc => Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Direction::*;
        match self {
            Asc => "ASC",
            Desc => "DESC",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self> {
        use Direction::*;
        if s.eq_ignore_ascii_case("ASC") {
            Ok(Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(Desc)
        } else {
            Err(SortError::InvalidDirection(s.to_owned()))
        }
    }
}

/// Resolved ordering for one request: internal field paths mapped to a
/// direction, in priority order (earlier paths dominate ties).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    fields: Vec<(String, Direction)>,
}

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `direction` for `path`. Re-adding a path overwrites its
    /// direction without changing its position.
    pub fn add(&mut self, path: impl Into<String>, direction: Direction) {
        let path = path.into();
        match self.fields.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = direction,
            None => self.fields.push((path, direction)),
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.fields.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn direction(&self, path: &str) -> Result<Direction> {
        self.fields
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, d)| *d)
            .ok_or_else(|| SortError::MissingDirection(path.to_owned()))
    }

    pub fn has(&self, path: &str) -> bool {
        self.fields.iter().any(|(p, _)| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.fields.iter().map(|(p, d)| (p.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
