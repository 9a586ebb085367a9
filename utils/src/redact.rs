//! Shortened identifiers for log lines.

/// Render a long identifier as `head…tail` so log lines stay readable and
/// never carry full account ids or hashes at info level.
pub fn short_id(id: &str) -> String {
    const KEEP: usize = 4;
    if !id.is_ascii() || id.len() <= KEEP * 2 + 1 {
        return id.to_string();
    }
    format!("{}…{}", &id[..KEEP], &id[id.len() - KEEP..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_account_ids() {
        let id = "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5";
        assert_eq!(short_id(id), "GBBD…FLA5");
    }

    #[test]
    fn leaves_short_values_alone() {
        assert_eq!(short_id("XLM"), "XLM");
        assert_eq!(short_id(""), "");
    }
}
