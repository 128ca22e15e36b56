//! Pagination metadata parsed from the `Link` response header.
//!
//! GitHub paginates list endpoints with a `Link` header of the form
//! `<url>; rel="next", <url>; rel="last"`. Most endpoints use a numeric
//! `page` parameter, some use `since`, and newer ones use opaque
//! `cursor`/`before`/`after` tokens. [`PageLinks::parse`] extracts all of them.
//!
//! Parsing is best-effort: a malformed entry is skipped and its fields stay
//! at their zero values. A response without a `Link` header is a single page.

use reqwest::Url;

/// Page cursors extracted from a `Link` header.
///
/// Numeric pages are `0` when absent; `next_page == 0` means there are no
/// more pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Page number of the first page.
    pub first_page: u32,
    /// Page number of the previous page.
    pub prev_page: u32,
    /// Page number of the next page.
    pub next_page: u32,
    /// Page number of the last page.
    pub last_page: u32,
    /// Non-numeric `page` value of the next link, for endpoints that hand out
    /// opaque page tokens.
    pub next_page_token: Option<String>,
    /// `cursor` value of the next link.
    pub cursor: Option<String>,
    /// `before` value of the previous link.
    pub before: Option<String>,
    /// `after` value of the next link.
    pub after: Option<String>,
}

impl PageLinks {
    /// Parses pagination links from a `Link` header value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use github_api::clients::PageLinks;
    ///
    /// let links = PageLinks::parse(
    ///     r#"<https://api.github.com/orgs/o/repos?page=3>; rel="next", <https://api.github.com/orgs/o/repos?page=1>; rel="prev""#,
    /// );
    /// assert_eq!(links.next_page, 3);
    /// assert_eq!(links.prev_page, 1);
    /// ```
    #[must_use]
    pub fn parse(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let mut segments = link.split(';');

            let Some(target) = segments.next().map(str::trim) else {
                continue;
            };
            let Some(target) = target
                .strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
            else {
                continue;
            };
            let Some(url) = Self::parse_url(target) else {
                continue;
            };

            let rels: Vec<&str> = segments.filter_map(Self::rel_value).collect();
            if rels.is_empty() {
                continue;
            }

            let param = |name: &str| {
                url.query_pairs()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.into_owned())
                    .filter(|value| !value.is_empty())
            };

            if let Some(cursor) = param("cursor") {
                if rels.contains(&"next") {
                    result.cursor = Some(cursor);
                }
                continue;
            }

            let since = param("since");
            let before = param("before");
            let after = param("after");
            let Some(page) = param("page").or_else(|| since.clone()).or_else(|| {
                (before.is_some() || after.is_some()).then(String::new)
            }) else {
                continue;
            };

            for rel in rels {
                match rel {
                    "next" => {
                        match page.parse() {
                            Ok(number) => result.next_page = number,
                            Err(_) if !page.is_empty() => {
                                result.next_page_token = Some(page.clone());
                            }
                            Err(_) => {}
                        }
                        result.after.clone_from(&after);
                    }
                    "prev" => {
                        result.prev_page = page.parse().unwrap_or_default();
                        result.before.clone_from(&before);
                    }
                    "first" => result.first_page = page.parse().unwrap_or_default(),
                    "last" => result.last_page = page.parse().unwrap_or_default(),
                    _ => {}
                }
            }
        }

        result
    }

    /// Returns `true` if another page follows, by number, token or cursor.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_page != 0
            || self.next_page_token.is_some()
            || self.cursor.is_some()
            || self.after.is_some()
    }

    /// Extracts the relation name from a `rel="name"` parameter.
    fn rel_value(segment: &str) -> Option<&str> {
        let value = segment.trim().strip_prefix("rel=")?;
        let value = value.trim_matches('"').trim();
        (!value.is_empty()).then_some(value)
    }

    /// Parses absolute link targets, and relative ones against a placeholder
    /// origin since only the query string matters.
    fn parse_url(target: &str) -> Option<Url> {
        Url::parse(target).ok().or_else(|| {
            Url::parse("http://localhost/")
                .ok()
                .and_then(|base| base.join(target).ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_and_prev_pages() {
        let link = r#"<https://api.github.com/orgs/o/repos?page=3>; rel="next", <https://api.github.com/orgs/o/repos?page=1>; rel="prev""#;
        let links = PageLinks::parse(link);

        assert_eq!(links.next_page, 3);
        assert_eq!(links.prev_page, 1);
        assert_eq!(links.first_page, 0);
        assert_eq!(links.last_page, 0);
        assert!(links.has_next());
    }

    #[test]
    fn test_parse_all_four_relations() {
        let link = concat!(
            r#"<https://api.github.com/?page=1>; rel="first", "#,
            r#"<https://api.github.com/?page=2>; rel="prev", "#,
            r#"<https://api.github.com/?page=4>; rel="next", "#,
            r#"<https://api.github.com/?page=5>; rel="last""#,
        );
        let links = PageLinks::parse(link);

        assert_eq!(links.first_page, 1);
        assert_eq!(links.prev_page, 2);
        assert_eq!(links.next_page, 4);
        assert_eq!(links.last_page, 5);
    }

    #[test]
    fn test_page_is_found_among_other_query_parameters() {
        let link = r#"<https://api.github.com/user/repos?per_page=100&page=7&sort=updated>; rel="next""#;
        assert_eq!(PageLinks::parse(link).next_page, 7);
    }

    #[test]
    fn test_missing_next_means_last_page() {
        let link = r#"<https://api.github.com/?page=1>; rel="first", <https://api.github.com/?page=4>; rel="prev""#;
        let links = PageLinks::parse(link);

        assert_eq!(links.next_page, 0);
        assert!(!links.has_next());
    }

    #[test]
    fn test_empty_header_is_single_page() {
        assert_eq!(PageLinks::parse(""), PageLinks::default());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let link = concat!(
            r#"https://api.github.com/?page=9; rel="first", "#,
            r#"<https://api.github.com/?page=2>, "#,
            r#"<https://api.github.com/?page=3>; rel="next""#,
        );
        let links = PageLinks::parse(link);

        assert_eq!(links.first_page, 0);
        assert_eq!(links.next_page, 3);
    }

    #[test]
    fn test_non_numeric_next_page_becomes_token() {
        let link = r#"<https://api.github.com/?page=Y3Vyc29yOnYy>; rel="next""#;
        let links = PageLinks::parse(link);

        assert_eq!(links.next_page, 0);
        assert_eq!(links.next_page_token, Some("Y3Vyc29yOnYy".to_string()));
        assert!(links.has_next());
    }

    #[test]
    fn test_since_stands_in_for_page() {
        let link = r#"<https://api.github.com/users?since=135>; rel="next""#;
        assert_eq!(PageLinks::parse(link).next_page, 135);
    }

    #[test]
    fn test_before_and_after_cursors() {
        let link = r#"<https://api.github.com/orgs/o/audit-log?after=MTYx&before=>; rel="next", <https://api.github.com/orgs/o/audit-log?before=MTYw>; rel="prev""#;
        let links = PageLinks::parse(link);

        assert_eq!(links.after, Some("MTYx".to_string()));
        assert_eq!(links.before, Some("MTYw".to_string()));
        assert_eq!(links.next_page, 0);
        assert!(links.next_page_token.is_none());
        assert!(links.has_next());
    }

    #[test]
    fn test_cursor_is_only_taken_from_next() {
        let link = r#"<https://api.github.com/x?cursor=abc>; rel="next", <https://api.github.com/x?cursor=zzz>; rel="prev""#;
        let links = PageLinks::parse(link);

        assert_eq!(links.cursor, Some("abc".to_string()));
    }

    #[test]
    fn test_relative_link_targets() {
        let link = r#"</orgs/o/repos?page=2>; rel="next""#;
        assert_eq!(PageLinks::parse(link).next_page, 2);
    }

    #[test]
    fn test_percent_encoded_values_are_decoded() {
        let link = r#"<https://api.github.com/x?after=a%3D%3D>; rel="next""#;
        assert_eq!(PageLinks::parse(link).after, Some("a==".to_string()));
    }
}
