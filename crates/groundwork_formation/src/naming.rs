//! Logical name construction.

/// Build a logical identifier from name fragments.
///
/// Fragments are split on `-`, `_`, `.` and whitespace, each piece is
/// capitalized, and anything non-alphanumeric is dropped, so the result is
/// always a valid resource identifier. The same fragments always produce
/// the same identifier.
pub fn logical_id<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut id = String::new();
    for part in parts {
        for piece in part
            .as_ref()
            .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        {
            let mut chars = piece.chars().filter(char::is_ascii_alphanumeric);
            if let Some(first) = chars.next() {
                id.extend(first.to_uppercase());
                id.extend(chars);
            }
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalizes_and_joins() {
        assert_eq!(logical_id(["application", "acme_web"]), "ApplicationAcmeWeb");
        assert_eq!(logical_id(["env", "prod", "acme_web"]), "EnvProdAcmeWeb");
    }

    #[test]
    fn test_strips_non_alphanumerics() {
        assert_eq!(logical_id(["dns", "web.example.com"]), "DnsWebExampleCom");
        assert_eq!(
            logical_id(["subnet", "eu-west-1a", "10.0.0.0/24"]),
            "SubnetEuWest1a100024"
        );
    }

    #[test]
    fn test_preserves_interior_case() {
        assert_eq!(logical_id(["myApp"]), "MyApp");
        assert_eq!(logical_id(["API"]), "API");
    }
}
