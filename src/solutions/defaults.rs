//! Built-in remediation guidance, used when the solution service is
//! unavailable or returns an incomplete response

use crate::models::{
    Effort, Priority, ProbeCategory, ResourceLink, Severity, Solution, SolutionConfidence,
};

/// Priority derived from finding severity: critical/high map to P0
pub fn priority_for(severity: &Severity) -> Priority {
    match severity {
        Severity::Critical | Severity::High => Priority::P0,
        _ => Priority::P1,
    }
}

fn owasp_link(title: &str, url: &str) -> ResourceLink {
    ResourceLink {
        kind: "guide".to_string(),
        title: title.to_string(),
        url: url.to_string(),
        youtube_id: None,
    }
}

/// Static per-category default solution
pub fn default_solution(attack: ProbeCategory, severity: &Severity) -> Solution {
    let priority = priority_for(severity);

    let (solution, steps, code_snippet, cwe, links, waf_rules): (
        &str,
        Vec<&str>,
        Option<&str>,
        &str,
        Vec<ResourceLink>,
        Vec<&str>,
    ) = match attack {
        ProbeCategory::Sqli => (
            "Use parameterized queries for every database access; never interpolate user input into SQL.",
            vec![
                "Replace string-built queries with prepared statements",
                "Apply least-privilege database accounts",
                "Disable verbose database errors in production",
            ],
            Some("let user = sqlx::query_as::<_, User>(\"SELECT * FROM users WHERE id = $1\")\n    .bind(id)\n    .fetch_one(&pool)\n    .await?;"),
            "CWE-89",
            vec![owasp_link(
                "OWASP SQL Injection Prevention Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/SQL_Injection_Prevention_Cheat_Sheet.html",
            )],
            vec!["SecRule ARGS \"@detectSQLi\" \"id:942100,deny\""],
        ),
        ProbeCategory::Xss => (
            "Encode all user-controlled output for its HTML context and deploy a restrictive Content-Security-Policy.",
            vec![
                "Apply context-aware output encoding in templates",
                "Set a Content-Security-Policy without unsafe-inline",
                "Validate and normalize input server-side",
            ],
            Some("Content-Security-Policy: default-src 'self'; script-src 'self'"),
            "CWE-79",
            vec![owasp_link(
                "OWASP XSS Prevention Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html",
            )],
            vec!["SecRule ARGS \"@detectXSS\" \"id:941100,deny\""],
        ),
        ProbeCategory::Idor => (
            "Authorize every object access against the authenticated principal; do not rely on identifier secrecy.",
            vec![
                "Check resource ownership on every read and write",
                "Use non-guessable identifiers (UUIDs) where exposure is unavoidable",
                "Log and alert on cross-account access attempts",
            ],
            None,
            "CWE-639",
            vec![owasp_link(
                "OWASP Authorization Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/Authorization_Cheat_Sheet.html",
            )],
            vec![],
        ),
        ProbeCategory::Csrf => (
            "Require a per-session anti-forgery token on every state-changing request and set SameSite cookies.",
            vec![
                "Enable the framework's CSRF middleware",
                "Set SameSite=Lax or Strict and Secure on session cookies",
                "Reject state-changing requests without a valid token",
            ],
            Some("Set-Cookie: session=...; Secure; HttpOnly; SameSite=Lax"),
            "CWE-352",
            vec![owasp_link(
                "OWASP CSRF Prevention Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/Cross-Site_Request_Forgery_Prevention_Cheat_Sheet.html",
            )],
            vec![],
        ),
        ProbeCategory::Cors => (
            "Replace wildcard or reflected origins with a strict allowlist and never combine wildcards with credentials.",
            vec![
                "Maintain an explicit allowlist of trusted origins",
                "Disable Access-Control-Allow-Credentials unless required",
                "Vary responses on the Origin header",
            ],
            Some("Access-Control-Allow-Origin: https://app.example.com"),
            "CWE-942",
            vec![owasp_link(
                "MDN: CORS configuration",
                "https://developer.mozilla.org/docs/Web/HTTP/CORS",
            )],
            vec![],
        ),
        ProbeCategory::Headers => (
            "Add the standard security response headers at the edge or application layer.",
            vec![
                "Set CSP, HSTS, X-Frame-Options, X-Content-Type-Options",
                "Add Referrer-Policy and Permissions-Policy",
                "Strip Server and X-Powered-By version details",
            ],
            Some("Strict-Transport-Security: max-age=31536000; includeSubDomains"),
            "CWE-693",
            vec![owasp_link(
                "OWASP Secure Headers Project",
                "https://owasp.org/www-project-secure-headers/",
            )],
            vec![],
        ),
        ProbeCategory::Jwt => (
            "Sign tokens with an asymmetric algorithm, reject alg=none, and keep expiries short.",
            vec![
                "Pin accepted algorithms server-side (e.g. RS256/ES256)",
                "Reject unsigned or downgraded tokens",
                "Limit token lifetime and rotate signing keys",
            ],
            None,
            "CWE-347",
            vec![owasp_link(
                "OWASP JWT Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/JSON_Web_Token_for_Java_Cheat_Sheet.html",
            )],
            vec![],
        ),
        ProbeCategory::Ssrf => (
            "Validate outbound request targets against an allowlist and block link-local and metadata addresses.",
            vec![
                "Resolve and validate hosts before fetching",
                "Deny RFC1918, loopback, and 169.254.169.254 ranges",
                "Use a dedicated egress proxy with its own allowlist",
            ],
            None,
            "CWE-918",
            vec![owasp_link(
                "OWASP SSRF Prevention Cheat Sheet",
                "https://cheatsheetseries.owasp.org/cheatsheets/Server_Side_Request_Forgery_Prevention_Cheat_Sheet.html",
            )],
            vec!["SecRule ARGS \"@rx 169\\.254\\.169\\.254\" \"id:934110,deny\""],
        ),
        ProbeCategory::DirectoryTraversal => (
            "Canonicalize file paths and confine reads to a fixed base directory.",
            vec![
                "Canonicalize the resolved path and verify its prefix",
                "Map user input to an allowlist of file identifiers",
                "Run the service with minimal filesystem permissions",
            ],
            Some("let path = base.join(name).canonicalize()?;\nif !path.starts_with(&base) {\n    return Err(Error::Forbidden);\n}"),
            "CWE-22",
            vec![owasp_link(
                "OWASP Path Traversal",
                "https://owasp.org/www-community/attacks/Path_Traversal",
            )],
            vec![],
        ),
        ProbeCategory::CryptographicFailures => (
            "Serve everything over TLS, keep secrets out of responses, and harden cookie attributes.",
            vec![
                "Redirect HTTP to HTTPS and enable HSTS",
                "Move keys and tokens out of client-visible responses",
                "Set Secure and HttpOnly on all cookies",
            ],
            None,
            "CWE-319",
            vec![owasp_link(
                "OWASP Cryptographic Failures",
                "https://owasp.org/Top10/A02_2021-Cryptographic_Failures/",
            )],
            vec![],
        ),
        ProbeCategory::InsecureDesign => (
            "Rate-limit sensitive operations and remove debug or admin surfaces from production.",
            vec![
                "Add per-client rate limiting on authentication and APIs",
                "Gate admin consoles behind VPN or SSO",
                "Disable debug endpoints in production builds",
            ],
            None,
            "CWE-1021",
            vec![owasp_link(
                "OWASP Insecure Design",
                "https://owasp.org/Top10/A04_2021-Insecure_Design/",
            )],
            vec![],
        ),
        ProbeCategory::VulnerableComponents => (
            "Upgrade the identified components to supported versions and suppress version banners.",
            vec![
                "Patch or upgrade the outdated component",
                "Track dependencies with an SBOM and update policy",
                "Remove version strings from Server and error pages",
            ],
            None,
            "CWE-1104",
            vec![owasp_link(
                "OWASP Vulnerable and Outdated Components",
                "https://owasp.org/Top10/A06_2021-Vulnerable_and_Outdated_Components/",
            )],
            vec![],
        ),
        ProbeCategory::IntegrityFailures => (
            "Add Subresource Integrity to third-party assets and avoid deserializing untrusted data.",
            vec![
                "Add integrity and crossorigin attributes to CDN tags",
                "Replace native deserialization with safe formats",
                "Verify signatures on updates and plugins",
            ],
            Some("<script src=\"https://cdn.example.com/lib.js\"\n        integrity=\"sha384-...\" crossorigin=\"anonymous\"></script>"),
            "CWE-502",
            vec![owasp_link(
                "OWASP Software and Data Integrity Failures",
                "https://owasp.org/Top10/A08_2021-Software_and_Data_Integrity_Failures/",
            )],
            vec![],
        ),
        ProbeCategory::LoggingFailures => (
            "Return generic error pages and keep stack traces in server-side logs only.",
            vec![
                "Install a catch-all error handler with generic responses",
                "Route detailed errors to structured server logs",
                "Alert on repeated error-triggering requests",
            ],
            None,
            "CWE-209",
            vec![owasp_link(
                "OWASP Security Logging and Monitoring Failures",
                "https://owasp.org/Top10/A09_2021-Security_Logging_and_Monitoring_Failures/",
            )],
            vec![],
        ),
        ProbeCategory::ApiVersioning => (
            "Retire or gate deprecated API versions so old behavior cannot be resurrected.",
            vec![
                "Return 410 Gone from removed versions",
                "Apply current auth and validation to any legacy routes kept",
                "Publish a deprecation schedule to API consumers",
            ],
            None,
            "CWE-1059",
            vec![owasp_link(
                "OWASP API Security Top 10",
                "https://owasp.org/API-Security/",
            )],
            vec![],
        ),
    };

    Solution {
        solution: solution.to_string(),
        remediation_steps: steps.into_iter().map(String::from).collect(),
        code_snippet: code_snippet.map(String::from),
        resource_links: links,
        cwe_cve: Some(cwe.to_string()),
        priority,
        estimated_effort: Effort::Med,
        confidence: SolutionConfidence::Med,
        waf_rules: waf_rules.into_iter().map(String::from).collect(),
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_follows_severity() {
        assert_eq!(priority_for(&Severity::Critical), Priority::P0);
        assert_eq!(priority_for(&Severity::High), Priority::P0);
        assert_eq!(priority_for(&Severity::Medium), Priority::P1);
        assert_eq!(priority_for(&Severity::Low), Priority::P1);
    }

    #[test]
    fn test_every_category_has_guidance() {
        for cat in ProbeCategory::ALL {
            let solution = default_solution(*cat, &Severity::Medium);
            assert!(!solution.solution.is_empty(), "empty guidance for {cat}");
            assert!(!solution.remediation_steps.is_empty());
            assert!(solution.cwe_cve.is_some());
        }
    }
}
