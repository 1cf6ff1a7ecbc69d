use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// Requests older (or newer) than this are treated as replays.
const MAX_CLOCK_SKEW_SECS: u64 = 60 * 5;

/// Check `X-Slack-Signature` against the raw request body.
///
/// The body must be the exact bytes Slack sent; re-encoding the form would
/// change the digest.
pub fn verify_slack_signature(
    signing_secret: &[u8],
    body: &[u8],
    timestamp: &str,
    signature: &str,
) -> bool {
    // Slack sends lowercase hex; hex::decode would also take uppercase
    let Some(expected) = signature
        .strip_prefix("v0=")
        .filter(|digest| is_lowercase_hex(digest))
        .and_then(|digest| hex::decode(digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(signing_secret) else {
        return false;
    };
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    // verify_slice compares in constant time
    mac.verify_slice(&expected).is_ok()
}

fn is_lowercase_hex(digest: &str) -> bool {
    digest
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Whether `timestamp` (unix seconds) is within five minutes of `now`.
pub fn is_timestamp_fresh(timestamp: &str, now: i64) -> bool {
    match timestamp.parse::<i64>() {
        Ok(ts) => now.abs_diff(ts) <= MAX_CLOCK_SKEW_SECS,
        Err(_) => false,
    }
}

#[cfg(test)]
pub fn sign(signing_secret: &[u8], body: &[u8], timestamp: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret).unwrap();
    mac.update(format!("v0:{}:", timestamp).as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"8f742231b10e8888abcd99yyyzzz85a5";
    const BODY: &[u8] = b"token=x&team_id=T1&channel_id=C1&user_id=U1&text=%3C%40U2%3E";
    const TS: &str = "1531420618";

    #[test]
    fn test_valid_signature() {
        let signature = sign(SECRET, BODY, TS);
        assert!(signature.starts_with("v0="));
        assert!(verify_slack_signature(SECRET, BODY, TS, &signature));
    }

    #[test]
    fn test_known_vector() {
        // Example request from Slack's signing documentation.
        let secret = b"8f742231b10e8888abcd99yyyzzz85a5";
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let signature = "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";
        assert!(verify_slack_signature(secret, body, "1531420618", signature));
    }

    #[test]
    fn test_single_byte_mutations_fail() {
        let signature = sign(SECRET, BODY, TS);

        let mut body = BODY.to_vec();
        body[0] ^= 0x01;
        assert!(!verify_slack_signature(SECRET, &body, TS, &signature));

        assert!(!verify_slack_signature(SECRET, BODY, "1531420619", &signature));

        let mut secret = SECRET.to_vec();
        secret[0] ^= 0x01;
        assert!(!verify_slack_signature(&secret, BODY, TS, &signature));
    }

    #[test]
    fn test_malformed_signatures_fail() {
        let signature = sign(SECRET, BODY, TS);
        let bare = signature.trim_start_matches("v0=");
        assert!(!verify_slack_signature(SECRET, BODY, TS, bare));
        assert!(!verify_slack_signature(SECRET, BODY, TS, "v0=not-hex"));
        assert!(!verify_slack_signature(SECRET, BODY, TS, ""));
        assert!(!verify_slack_signature(SECRET, BODY, TS, &signature[..signature.len() - 2]));
    }

    #[test]
    fn test_uppercase_hex_signature_fails() {
        let body = b"text=hi";
        let signature = sign(SECRET, body, "100");
        let upper = format!("v0={}", signature["v0=".len()..].to_uppercase());
        assert_ne!(upper, signature);
        assert!(verify_slack_signature(SECRET, body, "100", &signature));
        assert!(!verify_slack_signature(SECRET, body, "100", &upper));
        assert!(!verify_slack_signature(SECRET, body, "100", &signature.to_uppercase()));
    }

    #[test]
    fn test_timestamp_freshness() {
        let now = 1_700_000_000;
        assert!(is_timestamp_fresh("1700000000", now));
        assert!(is_timestamp_fresh("1699999700", now));
        assert!(is_timestamp_fresh("1700000300", now));
        assert!(!is_timestamp_fresh("1699999699", now));
        assert!(!is_timestamp_fresh("", now));
        assert!(!is_timestamp_fresh("yesterday", now));
        assert!(!is_timestamp_fresh("-9223372036854775808", now));
        assert!(!is_timestamp_fresh("9223372036854775807", now));
        assert!(!is_timestamp_fresh("1700000000", i64::MIN));
    }
}
