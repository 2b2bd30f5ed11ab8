use crate::catalog::CatalogPath;

/// The addressable location and its back/forward stacks.
///
/// Mirrors browser session history: the location is a `#path` fragment (or
/// nothing), `push` records a new entry and drops anything forward of it,
/// and `back`/`forward` only move the location. Loading whatever the
/// location now names is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    location: Option<String>,
    back: Vec<Option<String>>,
    forward: Vec<Option<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History opened at an existing location, as on page load.
    pub fn with_location(fragment: &str) -> Self {
        Self {
            location: CatalogPath::from_fragment(fragment).map(|p| p.to_fragment()),
            ..Self::default()
        }
    }

    /// The current fragment, `#` included.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The path named by the current location, if any.
    pub fn current_path(&self) -> Option<CatalogPath> {
        self.location.as_deref().and_then(CatalogPath::from_fragment)
    }

    /// Records `path` as the new location.
    pub fn push(&mut self, path: &CatalogPath) {
        let previous = self.location.replace(path.to_fragment());
        self.back.push(previous);
        self.forward.clear();
    }

    /// Moves one entry back. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        match self.back.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.location, previous);
                self.forward.push(current);
                true
            }
            None => false,
        }
    }

    /// Moves one entry forward. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        match self.forward.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.location, next);
                self.back.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}
