//! robots.txt: the file we serve, and a parser used to audit deployed ones.

use tornado_sitemap::cartography::record::page_location;

/// Rules from a robots.txt that apply to one user agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsRules {
    pub allowed: Vec<String>,
    pub disallowed: Vec<String>,
    pub sitemaps: Vec<String>,
}

impl RobotsRules {
    /// Whether `path` may be crawled. The longest matching rule wins, and
    /// `Allow` wins a tie.
    pub fn is_allowed(&self, path: &str) -> bool {
        let longest = |patterns: &[String]| {
            patterns
                .iter()
                .filter(|p| path_matches(path, p))
                .map(|p| p.len())
                .max()
        };

        match (longest(self.allowed.as_slice()), longest(self.disallowed.as_slice())) {
            (Some(allow), Some(disallow)) => allow >= disallow,
            (None, Some(_)) => false,
            _ => true,
        }
    }
}

/// robots.txt body advertising the sitemap under `frontend_url`.
pub fn render_robots(frontend_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        page_location(frontend_url, "sitemap.xml")
    )
}

/// Parse a robots.txt for `user_agent`. `Sitemap:` lines are global.
pub fn parse_robots(txt: &str, user_agent: &str) -> RobotsRules {
    let mut rules = RobotsRules::default();
    let mut in_matching_group = false;
    let mut found_matching_group = false;
    let ua_lower = user_agent.to_lowercase();

    for line in txt.lines() {
        // Inline comments; also covers full-line comments.
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let applies = in_matching_group || !found_matching_group;

        match key.trim().to_lowercase().as_str() {
            "user-agent" => {
                let ua = value.to_lowercase();
                in_matching_group = ua == "*" || ua == ua_lower;
                found_matching_group |= in_matching_group;
            }
            "allow" if applies && !value.is_empty() => rules.allowed.push(value.to_string()),
            "disallow" if applies && !value.is_empty() => rules.disallowed.push(value.to_string()),
            "sitemap" if !value.is_empty() => rules.sitemaps.push(value.to_string()),
            _ => {}
        }
    }

    rules
}

fn path_matches(path: &str, pattern: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        return path.starts_with(prefix);
    }
    if let Some(exact) = pattern.strip_suffix('$') {
        return path == exact;
    }
    !pattern.is_empty() && path.starts_with(pattern)
}
