//! CSRF probe: POST forms without anti-forgery tokens, weak cookie flags

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use scraper::{Html, Selector};

use super::Tuning;

/// Known anti-forgery token field names
const CSRF_FIELD_NAMES: &[&str] = &[
    "csrf",
    "csrf_token",
    "_csrf",
    "_token",
    "csrfmiddlewaretoken",
    "authenticity_token",
    "__requestverificationtoken",
    "antiforgerytoken",
    "xsrf",
    "_xsrf",
];

struct FormSummary {
    action: String,
    has_csrf_token: bool,
}

/// Fetches the page and inspects state-changing forms and session cookies
pub async fn probe(client: &HttpClient, url: &str, _tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let response = match client.get(url).await {
        Ok(r) => r,
        Err(_) => return findings,
    };

    let weak_cookies: Vec<String> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|cookie| {
            let lower = cookie.to_lowercase();
            !lower.contains("samesite") || !lower.contains("secure")
        })
        .map(|cookie| cookie.split(';').next().unwrap_or(cookie).to_string())
        .collect();

    let body = match response.text().await {
        Ok(b) => b,
        Err(_) => return findings,
    };

    let forms = extract_post_forms(&body);

    for form in &forms {
        if !form.has_csrf_token {
            let mut evidence = format!(
                "POST form (action='{}') has no anti-forgery token field",
                form.action
            );
            if !weak_cookies.is_empty() {
                evidence.push_str(&format!(
                    "; cookies missing SameSite/Secure: {}",
                    weak_cookies.join(", ")
                ));
            }
            findings.push(
                Finding::new(url, ProbeCategory::Csrf, Severity::Medium).with_evidence(evidence),
            );
        } else if !weak_cookies.is_empty() {
            findings.push(
                Finding::new(url, ProbeCategory::Csrf, Severity::Low).with_evidence(format!(
                    "POST form (action='{}') is token-protected but session cookies lack \
                     SameSite/Secure: {}",
                    form.action,
                    weak_cookies.join(", ")
                )),
            );
        }
    }

    findings
}

/// Extracts POST/PUT/DELETE forms from HTML (synchronous, no await while
/// holding parser state)
fn extract_post_forms(html: &str) -> Vec<FormSummary> {
    let document = Html::parse_document(html);
    let mut forms = Vec::new();

    let form_selector = match Selector::parse("form") {
        Ok(s) => s,
        Err(_) => return forms,
    };
    let input_selector = match Selector::parse("input[name]") {
        Ok(s) => s,
        Err(_) => return forms,
    };

    for form in document.select(&form_selector) {
        let method = form
            .value()
            .attr("method")
            .unwrap_or("get")
            .to_lowercase();
        if method != "post" && method != "put" && method != "delete" {
            continue;
        }

        let action = form.value().attr("action").unwrap_or("").to_string();
        let has_csrf_token = form.select(&input_selector).any(|input| {
            input
                .value()
                .attr("name")
                .map(|name| {
                    let lower = name.to_lowercase();
                    CSRF_FIELD_NAMES.iter().any(|csrf| lower.contains(csrf))
                })
                .unwrap_or(false)
        });

        forms.push(FormSummary {
            action,
            has_csrf_token,
        });
    }

    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_without_token_detected() {
        let html = r#"
            <form method="post" action="/transfer">
                <input name="amount"/><input name="to"/>
            </form>
        "#;
        let forms = extract_post_forms(html);
        assert_eq!(forms.len(), 1);
        assert!(!forms[0].has_csrf_token);
    }

    #[test]
    fn test_token_field_recognized() {
        let html = r#"
            <form method="POST" action="/login">
                <input name="user"/>
                <input type="hidden" name="csrf_token" value="abc"/>
            </form>
        "#;
        let forms = extract_post_forms(html);
        assert!(forms[0].has_csrf_token);
    }

    #[test]
    fn test_get_forms_ignored() {
        let html = r#"<form method="get" action="/search"><input name="q"/></form>"#;
        assert!(extract_post_forms(html).is_empty());
    }
}
