//! Declarative signature tables shared by the classifier, fingerprinter,
//! and probes. Kept as `(pattern, label)` data so new signatures can be
//! added without touching control flow.

use regex::Regex;

/// SQL error signatures mapped to the database engine they identify
pub const SQL_ERRORS: &[(&str, &str)] = &[
    (r"(?i)you have an error in your sql syntax", "MySQL"),
    (r"(?i)warning:.*mysql", "MySQL"),
    (r"(?i)mysql_fetch", "MySQL"),
    (r"(?i)mysqli?_error", "MySQL"),
    (r"(?i)unclosed quotation mark", "MSSQL"),
    (r"(?i)microsoft sql server", "MSSQL"),
    (r"(?i)ora-\d{5}", "Oracle"),
    (r"(?i)postgresql.*error", "PostgreSQL"),
    (r"(?i)pg_query\(\)", "PostgreSQL"),
    (r"(?i)sqlite3?\.operationalerror", "SQLite"),
    (r"(?i)sql syntax.*error", "Generic SQL"),
    (r"(?i)sqlstate\[", "Generic SQL (PDO)"),
    (r"(?i)odbc.*driver", "ODBC"),
];

/// Exchanges matching these never become probe targets. Deliberately
/// narrow: transport and analytics keywords plus health-check paths only,
/// anchored so ordinary API paths cannot match by coincidence.
pub const NOISE_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)socket\.io", "websocket transport"),
    (r"(?i)/sockjs", "websocket transport"),
    (r"(?i)^wss?://", "websocket transport"),
    (r"(?i)signalr", "websocket transport"),
    (r"(?i)google-analytics\.com", "analytics"),
    (r"(?i)googletagmanager\.com", "analytics"),
    (r"(?i)https?://[^/]*analytics\.", "analytics"),
    (r"(?i)segment\.io", "analytics"),
    (r"(?i)sentry\.io", "telemetry"),
    (r"(?i)hotjar\.com", "telemetry"),
    (r"(?i)doubleclick\.net", "ad telemetry"),
    (r"(?i)/(healthz?|health-check|ping|heartbeat)([/?]|$)", "health check"),
];

/// Outdated-software version signatures checked against Server banners
/// and response bodies
pub const VERSION_SIGNATURES: &[(&str, &str)] = &[
    (r"(?i)apache/2\.[02]\.", "Apache 2.0/2.2 (end of life)"),
    (r"(?i)apache/1\.", "Apache 1.x (end of life)"),
    (r"(?i)nginx/0\.", "nginx 0.x (end of life)"),
    (r"(?i)nginx/1\.[0-9]\.", "nginx < 1.10 (outdated)"),
    (r"(?i)php/5\.", "PHP 5.x (end of life)"),
    (r"(?i)php/7\.[0-3]\.", "PHP 7.0-7.3 (end of life)"),
    (r"(?i)openssl/1\.0\.", "OpenSSL 1.0.x (end of life)"),
    (r"(?i)jquery[/\s-]*1\.[0-9]\.", "jQuery 1.x (outdated)"),
    (r"(?i)iis/[1-6]\.", "IIS 6 or older (end of life)"),
    (r"(?i)tomcat/[1-7]\.", "Tomcat 7 or older (end of life)"),
    (r"(?i)express/[1-3]\.", "Express 3 or older (outdated)"),
];

/// Secret-shaped strings that should never appear in response bodies
pub const SECRET_PATTERNS: &[(&str, &str)] = &[
    (r"AKIA[0-9A-Z]{16}", "AWS access key id"),
    (r"-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----", "private key material"),
    (r#"(?i)api[_-]?key["']?\s*[:=]\s*["'][A-Za-z0-9_\-]{16,}"#, "hardcoded API key"),
    (r#"(?i)secret["']?\s*[:=]\s*["'][A-Za-z0-9_\-]{12,}"#, "hardcoded secret"),
    (r#"(?i)password["']?\s*[:=]\s*["'][^"']{6,}"#, "hardcoded password"),
    (r"ghp_[A-Za-z0-9]{36}", "GitHub personal access token"),
    (r"xox[baprs]-[A-Za-z0-9-]{10,}", "Slack token"),
];

/// Content signatures of system files disclosed via path traversal
pub const SYSTEM_FILE_MARKERS: &[(&str, &str)] = &[
    (r"root:.?:0:0:", "/etc/passwd content"),
    (r"daemon:.*:/usr/sbin", "/etc/passwd content"),
    (r"127\.0\.0\.1\s+localhost", "hosts file content"),
    (r"\[boot loader\]", "boot.ini content"),
    (r"; for 16-bit app support", "win.ini content"),
];

/// Verbose-error phrasing that indicates stack trace or path leakage
pub const STACK_TRACE_MARKERS: &[(&str, &str)] = &[
    (r"(?i)stack trace:", "stack trace"),
    (r"at [\w.$<>]+\([\w.]+\.java:\d+\)", "Java stack frame"),
    (r"(?i)exception in thread", "Java exception"),
    (r"Traceback \(most recent call last\)", "Python traceback"),
    (r#"File "[^"]+", line \d+"#, "Python stack frame"),
    (r"(?i)fatal error:", "PHP fatal error"),
    (r"(?i)warning:.*on line \d+", "PHP warning with line number"),
    (r"(?i)at [A-Za-z_][\w.]*\.(cs|vb):line \d+", ".NET stack frame"),
    (r"(?i)node_modules[/\\][\w@./\\-]+\.js:\d+", "Node.js stack frame"),
    (r"(?i)(/var/www|/usr/share/nginx|c:\\inetpub)[^\s<>\"]*", "filesystem path leak"),
];

/// Cloud metadata-service keywords leaked by SSRF responses
pub const CLOUD_METADATA_MARKERS: &[(&str, &str)] = &[
    ("ami-id", "EC2 metadata"),
    ("instance-id", "EC2 metadata"),
    ("iam/security-credentials", "EC2 IAM credentials"),
    ("computeMetadata", "GCP metadata"),
    ("metadata.google.internal", "GCP metadata"),
];

/// Connection-error phrasing surfaced in SSRF probe responses
pub const CONNECTION_ERROR_MARKERS: &[(&str, &str)] = &[
    ("ECONNREFUSED", "connection refused"),
    ("connection refused", "connection refused"),
    ("Connection timed out", "connection timeout"),
    ("getaddrinfo", "DNS resolution failure"),
    ("EHOSTUNREACH", "host unreachable"),
    ("no route to host", "host unreachable"),
];

/// Source patterns of unsafe deserialization calls
pub const DESERIALIZATION_MARKERS: &[(&str, &str)] = &[
    ("pickle.loads", "Python pickle deserialization"),
    ("unserialize(", "PHP unserialize"),
    ("ObjectInputStream", "Java native deserialization"),
    ("readObject(", "Java native deserialization"),
    ("Marshal.load", "Ruby Marshal deserialization"),
    ("yaml.load(", "unsafe YAML load"),
];

/// Returns the label of the first regex in `table` matching `text`
pub fn match_first(text: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    for (pattern, label) in table {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(text) {
                return Some(label);
            }
        }
    }
    None
}

/// Returns every distinct label whose regex matches `text`
pub fn match_all(text: &str, table: &[(&str, &'static str)]) -> Vec<&'static str> {
    let mut labels = Vec::new();
    for (pattern, label) in table {
        if labels.contains(label) {
            continue;
        }
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(text) {
                labels.push(label);
            }
        }
    }
    labels
}

/// Returns the label of the first substring pattern contained in `text`
pub fn contains_any(text: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(pattern, _)| lower.contains(&pattern.to_lowercase()))
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_error_signatures() {
        assert_eq!(
            match_first("Warning: mysql_fetch_array() expects...", SQL_ERRORS),
            Some("MySQL")
        );
        assert_eq!(match_first("ORA-01756: quoted string", SQL_ERRORS), Some("Oracle"));
        assert_eq!(match_first("<html>all fine</html>", SQL_ERRORS), None);
    }

    #[test]
    fn test_noise_is_narrow() {
        assert!(match_first("wss://site.test/cable", NOISE_PATTERNS).is_some());
        assert!(match_first("https://www.google-analytics.com/collect", NOISE_PATTERNS).is_some());
        assert!(match_first("https://site.test/ping", NOISE_PATTERNS).is_some());
        assert!(match_first("https://site.test/api/users", NOISE_PATTERNS).is_none());
        assert!(match_first("https://site.test/api/pingback-settings", NOISE_PATTERNS).is_none());
    }

    #[test]
    fn test_system_file_markers() {
        assert!(match_first("root:x:0:0:root:/root:/bin/bash", SYSTEM_FILE_MARKERS).is_some());
        assert!(match_first("127.0.0.1\tlocalhost", SYSTEM_FILE_MARKERS).is_some());
    }

    #[test]
    fn test_version_signatures() {
        assert!(match_first("Apache/2.2.34 (Unix)", VERSION_SIGNATURES).is_some());
        assert!(match_first("nginx/1.25.3", VERSION_SIGNATURES).is_none());
    }
}
