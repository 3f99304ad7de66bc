/// Trims `value` and maps empty results to `None`.
pub fn fix_empty_and_trim(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_empty_and_trim() {
        assert_eq!(None, fix_empty_and_trim(None));
        assert_eq!(None, fix_empty_and_trim(Some("")));
        assert_eq!(None, fix_empty_and_trim(Some(" \t ")));
        assert_eq!(Some("h1".to_owned()), fix_empty_and_trim(Some(" h1\n")));
        assert_eq!(Some("a b".to_owned()), fix_empty_and_trim(Some("a b")));
    }
}
