use std::collections::HashSet;

/// URLs already scheduled during one crawl
///
/// A URL is inserted once, when its wave's batch is built, and never removed.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited
    ///
    /// # Returns
    ///
    /// `true` if the URL had not been visited before
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// A URL waiting in the frontier together with its link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// The set of URLs making up one wave
///
/// Insertion order is kept and the first occurrence of a URL wins.
#[derive(Debug, Default, Clone)]
pub struct FrontierLevel {
    entries: Vec<FrontierEntry>,
    seen: HashSet<String>,
}

impl FrontierLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL at the given depth
    ///
    /// # Returns
    ///
    /// `true` if the URL was not already part of this level
    pub fn push(&mut self, url: impl Into<String>, depth: u32) -> bool {
        let url = url.into();
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.entries.push(FrontierEntry { url, depth });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for FrontierLevel {
    type Item = FrontierEntry;
    type IntoIter = std::vec::IntoIter<FrontierEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Traversal state for a single crawl run
///
/// Created fresh for every run and passed through the wave loop, so two
/// crawls never share visited URLs.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: VisitedSet,
    frontier: FrontierLevel,
    depth: u32,
}

impl CrawlState {
    /// Creates the state for a crawl that starts at `seed` (depth 0)
    pub fn new(seed: &str) -> Self {
        let mut frontier = FrontierLevel::new();
        frontier.push(seed, 0);
        Self {
            visited: VisitedSet::new(),
            frontier,
            depth: 0,
        }
    }

    /// Depth of the wave the frontier currently holds
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Builds the batch for the current wave
    ///
    /// Every frontier URL not yet visited is marked visited and returned, in
    /// frontier order. The frontier is left empty.
    pub fn take_batch(&mut self) -> Vec<FrontierEntry> {
        let frontier = std::mem::take(&mut self.frontier);
        frontier
            .into_iter()
            .filter(|entry| self.visited.insert(&entry.url))
            .collect()
    }

    /// Installs the next wave's frontier at `depth + 1`
    ///
    /// Links that were already visited are skipped. Returns the number of
    /// URLs that entered the frontier.
    pub fn advance<I, S>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next_depth = self.depth + 1;
        let mut next = FrontierLevel::new();
        for link in links {
            let link = link.into();
            if !self.visited.contains(&link) {
                next.push(link, next_depth);
            }
        }

        let added = next.len();
        self.frontier = next;
        self.depth = next_depth;
        added
    }
}
