//! Source host allowlist.
//!
//! # Responsibilities
//! - Hold the fixed set of feed hosts the proxy may fetch from
//! - Answer membership by exact hostname equality
//!
//! # Design Decisions
//! - Compiled in; never reloaded or mutated at runtime
//! - No wildcard or subdomain matching (`bbc.co.uk` does not admit `feeds.bbci.co.uk`)
//! - Callers pass the parsed, normalized hostname (lower-case, no port)

use std::collections::HashSet;

/// Hosts the proxy is allowed to fetch feeds from.
pub const ALLOWED_DOMAINS: &[&str] = &[
    // Core news
    "feeds.bbci.co.uk", "www.theguardian.com", "feeds.npr.org", "news.google.com",
    "www.aljazeera.com", "rss.cnn.com", "feeds.reuters.com", "www.reuters.com",
    "www.bbc.com", "www.france24.com", "www.euronews.com", "rss.dw.com",
    // Women's rights sources
    "www.unwomen.org", "www.hrw.org", "www.amnesty.org", "www.girlsnotbrides.org",
    "msmagazine.com", "womensmediacenter.com", "www.equalitynow.org",
    "www.girlsglobe.org", "www.awid.org", "giwps.georgetown.edu",
    "www.womenofcolor.net", "www.care.org", "www.globalfundforwomen.org",
    "www.womenslinkworldwide.org", "www.feministmajority.org",
    "www.reproductiverights.org", "www.plannedparenthood.org",
    "www.now.org", "www.catalyst.org", "www.weforum.org",
    "www.unicef.org", "www.unfpa.org", "www.who.int",
    "giwps.georgetown.edu", "www.icrw.org",
    // International orgs
    "news.un.org", "www.iaea.org", "www.crisisgroup.org", "worldbank.org",
    "www.imf.org", "www.fao.org",
    // Regional & geopolitical
    "www.cfr.org", "www.brookings.edu", "carnegieendowment.org",
    "www.rand.org", "www.atlanticcouncil.org",
    "english.alarabiya.net", "www.arabnews.com", "www.timesofisrael.com",
    "www.scmp.com", "kyivindependent.com", "www.thehindu.com",
    "www.premiumtimesng.com", "www.vanguardngr.com",
    "www.channelnewsasia.com", "www.africanews.com",
    // Tech
    "techcrunch.com", "venturebeat.com", "www.technologyreview.com",
    // Finance
    "finance.yahoo.com", "www.ft.com",
    // Misc
    "hnrss.org", "news.ycombinator.com", "rsshub.app",
];

/// Immutable set of allowed feed hostnames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    hosts: HashSet<String>,
}

impl Allowlist {
    /// Build an allowlist from an explicit set of hostnames.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// The compiled-in production allowlist.
    pub fn builtin() -> Self {
        Self::new(ALLOWED_DOMAINS.iter().copied())
    }

    /// Exact-match membership test.
    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains(hostname)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hostnames in lexical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_known_feeds() {
        let allowlist = Allowlist::builtin();
        assert!(allowlist.contains("feeds.bbci.co.uk"));
        assert!(allowlist.contains("news.google.com"));
        assert!(allowlist.contains("rsshub.app"));
    }

    #[test]
    fn test_exact_match_only() {
        let allowlist = Allowlist::builtin();
        assert!(!allowlist.contains("evil.example.com"));
        assert!(!allowlist.contains("bbci.co.uk"));
        assert!(!allowlist.contains("sub.feeds.bbci.co.uk"));
        assert!(!allowlist.contains("FEEDS.BBCI.CO.UK"));
        assert!(!allowlist.contains(""));
    }

    #[test]
    fn test_duplicates_collapse() {
        // giwps.georgetown.edu is listed twice
        let allowlist = Allowlist::builtin();
        assert_eq!(allowlist.len(), ALLOWED_DOMAINS.len() - 1);
    }

    #[test]
    fn test_sorted_is_ordered() {
        let allowlist = Allowlist::new(["b.org", "a.org", "c.org"]);
        assert_eq!(allowlist.sorted(), vec!["a.org", "b.org", "c.org"]);
    }
}
