use std::collections::HashSet;

/// Expand a header field into its alternative surface forms. Alternatives are
/// separated by a middle dot, written with either the fullwidth or the
/// halfwidth code point depending on the source.
pub fn expand(text: &str) -> HashSet<String> {
    text.split(['・', '･'])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_both_dot_forms() {
        let v = expand("所I･処");
        assert!(v.contains("所I"));
        assert!(v.contains("処"));

        let v = expand("等しい・均しい・斉しい");
        assert_eq!(v.len(), 3);
        assert!(v.contains("均しい"));
    }

    #[test]
    fn trims_and_drops_empty_pieces() {
        let v = expand(" 反 ･ ･段 ");
        assert_eq!(v.len(), 2);
        assert!(v.contains("反"));
        assert!(v.contains("段"));
        assert!(expand("").is_empty());
        assert!(expand("・・").is_empty());
    }

    #[test]
    fn single_form_kept_whole() {
        let v = expand("はんい");
        assert_eq!(v.len(), 1);
        assert!(v.contains("はんい"));
    }
}
