//! Client identification headers
//!
//! MediaWiki asks API clients to send a stable, identifying User-Agent
//! rather than a browser string.

/// Build the identifying User-Agent, optionally with a contact address
pub fn identifying_user_agent(contact: Option<&str>) -> String {
    let base = format!("{}/{}", env!("CARGO_PKG_NAME"), crate::VERSION);
    match contact.map(str::trim).filter(|c| !c.is_empty()) {
        Some(contact) => format!("{} ({})", base, contact),
        None => base,
    }
}

/// Standard accept header for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_without_contact() {
        let ua = identifying_user_agent(None);
        assert!(ua.starts_with("wiki-fetch-cache/"));
        assert!(!ua.contains('('));
    }

    #[test]
    fn test_user_agent_with_contact() {
        let ua = identifying_user_agent(Some("ops@example.org"));
        assert!(ua.ends_with(" (ops@example.org)"));
        assert_eq!(identifying_user_agent(Some("  ")), identifying_user_agent(None));
    }
}
