//! HTML presentation of a selected announcement.

use tracing::warn;

use crate::models::announcement::Announcement;

/// Formats `{title, excerpt, cta?}` as a self-contained HTML fragment.
/// The call-to-action is emitted only when both text and link are present.
pub fn render_fragment(a: &Announcement) -> String {
    let mut html = format!(
        "<aside class=\"announcement announcement--{}\" data-announcement-id=\"{}\">\n",
        a.scope.as_str(),
        a.id
    );
    html.push_str(&format!("  <h3>{}</h3>\n", escape_html(&a.title)));
    if !a.excerpt.trim().is_empty() {
        html.push_str(&format!("  <p>{}</p>\n", escape_html(a.excerpt.trim())));
    }
    let link = non_blank(&a.cta_link).filter(|link| {
        let safe = is_safe_link(link);
        if !safe {
            warn!(
                announcement_id = %a.id,
                "Dropping call-to-action with unsupported link scheme"
            );
        }
        safe
    });
    if let (Some(text), Some(link)) = (non_blank(&a.cta_text), link) {
        html.push_str(&format!(
            "  <a class=\"announcement__cta\" href=\"{}\">{}</a>\n",
            escape_html(link),
            escape_html(text)
        ));
    }
    html.push_str("</aside>");
    html
}

/// `http`/`https` URLs and relative links only.
fn is_safe_link(link: &str) -> bool {
    let scheme_end = link.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(idx) if link[idx..].starts_with(':') => {
            let scheme = link[..idx].to_ascii_lowercase();
            scheme == "http" || scheme == "https"
        }
        _ => true,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::announcement::AnnouncementScope;
    use uuid::Uuid;

    fn announcement() -> Announcement {
        Announcement {
            id: Uuid::from_u128(7),
            title: "Rates <dropped> & holding".to_string(),
            excerpt: "Lock in before \"summer\".".to_string(),
            cta_text: Some("Get a quote".to_string()),
            cta_link: Some("https://example.com/quote?a=1&b=2".to_string()),
            scope: AnnouncementScope::Global,
            target_state_ids: vec![],
            target_city_ids: vec![],
            target_subject_ids: vec![],
            exclude_subject_ids: vec![],
            priority: 0,
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    #[test]
    fn test_fragment_escapes_author_text() {
        let html = render_fragment(&announcement());
        assert!(html.contains("<h3>Rates &lt;dropped&gt; &amp; holding</h3>"));
        assert!(html.contains("<p>Lock in before &quot;summer&quot;.</p>"));
        assert!(html.contains("href=\"https://example.com/quote?a=1&amp;b=2\""));
        assert!(html.starts_with("<aside class=\"announcement announcement--global\""));
    }

    #[test]
    fn test_cta_needs_text_and_link() {
        let mut a = announcement();
        a.cta_link = None;
        assert!(!render_fragment(&a).contains("<a "));

        a.cta_link = Some("https://example.com".to_string());
        a.cta_text = Some("  ".to_string());
        assert!(!render_fragment(&a).contains("<a "));
    }

    #[test]
    fn test_cta_link_scheme_allow_list() {
        let mut a = announcement();
        for bad in ["javascript:alert(1)", " JavaScript:alert(1)", "data:text/html,x"] {
            a.cta_link = Some(bad.to_string());
            assert!(!render_fragment(&a).contains("<a "), "{bad}");
        }
        let good_links = [
            "https://example.com/x",
            "HTTP://example.com",
            "/open-house",
            "#rates",
            "listings?page=2",
        ];
        for good in good_links {
            a.cta_link = Some(good.to_string());
            assert!(render_fragment(&a).contains("<a "), "{good}");
        }
    }

    #[test]
    fn test_blank_excerpt_omits_paragraph() {
        let mut a = announcement();
        a.excerpt = String::new();
        assert!(!render_fragment(&a).contains("<p>"));
    }
}
