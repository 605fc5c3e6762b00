//! JWT probe: scans bodies for tokens and decodes header/payload
//!
//! No signature verification happens here; only the unauthenticated
//! parts are decoded and inspected.

use crate::http::HttpClient;
use crate::models::{Finding, ProbeCategory, Severity};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde_json::Value;

use super::{fetch, Tuning};

const JWT_PATTERN: &str = r"eyJ[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]*";

/// Finds JWT-shaped tokens in the response and flags weak configurations
pub async fn probe(client: &HttpClient, url: &str, tuning: &Tuning) -> Vec<Finding> {
    let mut findings = Vec::new();

    let body = match fetch(client, url).await {
        Some((_, body)) => body,
        None => return findings,
    };

    let re = match Regex::new(JWT_PATTERN) {
        Ok(re) => re,
        Err(_) => return findings,
    };

    for token in re.find_iter(&body).take(5) {
        let token = token.as_str();
        let (header, payload) = match decode_parts(token) {
            Some(parts) => parts,
            None => continue,
        };

        let alg = header
            .get("alg")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        match alg.as_str() {
            "none" | "None" | "NONE" => {
                findings.push(
                    Finding::new(url, ProbeCategory::Jwt, Severity::Critical).with_evidence(
                        format!("JWT in response uses alg=none (unsigned token accepted): {}…",
                            &token[..token.len().min(24)]),
                    ),
                );
            }
            "HS256" => {
                findings.push(
                    Finding::new(url, ProbeCategory::Jwt, Severity::Low).with_evidence(
                        "JWT in response uses HS256; symmetric signing keys are prone to \
                         brute force when weak"
                            .to_string(),
                    ),
                );
            }
            _ => {}
        }

        if let Some(exp) = payload.get("exp").and_then(|v| v.as_i64()) {
            let horizon = chrono::Utc::now().timestamp() + tuning.jwt_max_expiry_days * 86_400;
            if exp > horizon {
                findings.push(
                    Finding::new(url, ProbeCategory::Jwt, Severity::Medium).with_evidence(
                        format!(
                            "JWT expiry is more than {} days out (exp={exp})",
                            tuning.jwt_max_expiry_days
                        ),
                    ),
                );
            }
        }
    }

    findings
}

/// Decodes the header and payload segments of a JWT, tolerating padding
fn decode_parts(token: &str) -> Option<(Value, Value)> {
    let mut segments = token.split('.');
    let header = decode_segment(segments.next()?)?;
    let payload = decode_segment(segments.next()?)?;
    Some((header, payload))
}

fn decode_segment(segment: &str) -> Option<Value> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).expect("serializable"))
    }

    #[test]
    fn test_decode_parts() {
        let header = serde_json::json!({"alg": "none", "typ": "JWT"});
        let payload = serde_json::json!({"sub": "1", "exp": 9999999999i64});
        let token = format!("{}.{}.", encode(&header), encode(&payload));

        let (h, p) = decode_parts(&token).expect("decodes");
        assert_eq!(h.get("alg").and_then(|v| v.as_str()), Some("none"));
        assert_eq!(p.get("exp").and_then(|v| v.as_i64()), Some(9999999999));
    }

    #[test]
    fn test_garbage_not_decoded() {
        assert!(decode_parts("eyJhb.not-base64!!.sig").is_none());
    }
}
