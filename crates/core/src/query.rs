pub const QUERY_PLACEHOLDER: &str = "{query}";
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Characters `encodeURIComponent` leaves alone but `urlencoding` escapes.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a query the way browsers' `encodeURIComponent` does.
pub fn encode_query(query: &str) -> String {
    // a literal '%' is escaped to "%25", so these escapes can only come from the marks
    UNRESERVED_MARKS
        .iter()
        .fold(urlencoding::encode(query).into_owned(), |acc, (escaped, mark)| {
            acc.replace(escaped, mark)
        })
}

/// Render a source API template.
///
/// The first `{query}` is replaced with the percent-encoded query, then the
/// first `{page}` with the decimal page. Later occurrences stay as they are.
pub fn render_api_url(template: &str, query: &str, page: i64) -> String {
    let encoded = encode_query(query);
    let with_query = template.replacen(QUERY_PLACEHOLDER, &encoded, 1);
    with_query.replacen(PAGE_PLACEHOLDER, &page.to_string(), 1)
}

/// Placeholders absent from a template, for load-time warnings.
pub fn missing_placeholders(template: &str) -> Vec<&'static str> {
    [QUERY_PLACEHOLDER, PAGE_PLACEHOLDER]
        .into_iter()
        .filter(|p| !template.contains(p))
        .collect()
}
