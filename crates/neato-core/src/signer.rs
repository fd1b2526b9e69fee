//! Request signing for the robot message endpoint.
//!
//! Each robot shares a secret key with the cloud. A request is authenticated
//! by an HMAC-SHA256 over the lowercased serial, the `Date` header and the
//! exact body bytes, so a header set is only valid for the body and instant
//! it was computed for.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::headers::HeaderSet;

type HmacSha256 = Hmac<Sha256>;

/// Media type the robot message endpoint expects in `Accept`.
pub const NUCLEO_ACCEPT: &str = "application/vnd.neato.nucleo.v1";

/// Scheme prefix of the robot `Authorization` header.
pub const AUTH_SCHEME: &str = "NEATOAPP";

/// Sign `body` for the robot `serial` at the current instant.
#[must_use]
pub fn sign(serial: &str, secret_key: &str, body: &[u8]) -> HeaderSet {
    sign_at(serial, secret_key, body, Utc::now())
}

/// Sign `body` for the robot `serial` as of `now`.
#[must_use]
pub fn sign_at(serial: &str, secret_key: &str, body: &[u8], now: DateTime<Utc>) -> HeaderSet {
    let date = http_date(now);
    let signature = signature(serial, secret_key, &date, body);

    let mut headers = HeaderSet::new();
    headers.set("Accept", NUCLEO_ACCEPT);
    headers.set("Date", date);
    headers.set("Authorization", format!("{AUTH_SCHEME} {signature}"));
    headers
}

/// Format an instant the way the robot endpoint expects in `Date`,
/// e.g. `Tue, 2 Jan 2024 15:04:05 GMT`. The day of month is not padded.
#[must_use]
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}

/// Lowercase hex HMAC-SHA256 of `lowercase(serial) \n date \n body`.
#[must_use]
pub fn signature(serial: &str, secret_key: &str, date: &str, body: &[u8]) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret_key.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts keys of any length")
    };
    mac.update(serial.to_lowercase().as_bytes());
    mac.update(b"\n");
    mac.update(date.as_bytes());
    mac.update(b"\n");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SERIAL: &str = "OPS01234-ABCDEF012345";
    const SECRET: &str = "0123456789abcdef0123456789abcdef";
    const BODY: &[u8] = br#"{"reqId":"1","cmd":"getRobotState"}"#;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn date_day_is_not_padded() {
        assert_eq!(http_date(instant()), "Tue, 2 Jan 2024 15:04:05 GMT");

        let later = Utc.with_ymd_and_hms(2024, 3, 15, 9, 5, 7).unwrap();
        assert_eq!(http_date(later), "Fri, 15 Mar 2024 09:05:07 GMT");
    }

    #[test]
    fn known_answer() {
        let sig = signature(SERIAL, SECRET, "Tue, 2 Jan 2024 15:04:05 GMT", BODY);
        assert_eq!(
            sig,
            "083d158fbf503e922e01070ada87f15668996bbf255becac333e0504ab790e76"
        );
    }

    #[test]
    fn empty_body_known_answer() {
        let sig = signature(SERIAL, SECRET, "Tue, 2 Jan 2024 15:04:05 GMT", b"");
        assert_eq!(
            sig,
            "79bd8c8e9b7ebdc8edbfcd929e4bf2edbf920b70869870ca63ddb7de3234eec4"
        );
    }

    #[test]
    fn serial_case_does_not_matter() {
        let date = http_date(instant());
        assert_eq!(
            signature(SERIAL, SECRET, &date, BODY),
            signature(&SERIAL.to_lowercase(), SECRET, &date, BODY)
        );
    }

    #[test]
    fn every_input_changes_signature() {
        let date = http_date(instant());
        let base = signature(SERIAL, SECRET, &date, BODY);

        assert_ne!(base, signature("OPS01234-ABCDEF012346", SECRET, &date, BODY));
        assert_ne!(
            base,
            signature(SERIAL, "0123456789abcdef0123456789abcdee", &date, BODY)
        );
        assert_ne!(
            base,
            signature(SERIAL, SECRET, "Tue, 2 Jan 2024 15:04:06 GMT", BODY)
        );
        assert_ne!(
            base,
            signature(SERIAL, SECRET, &date, br#"{"reqId":"2","cmd":"getRobotState"}"#)
        );
    }

    #[test]
    fn signed_headers() {
        let headers = sign_at(SERIAL, SECRET, BODY, instant());

        assert_eq!(headers.get("Accept"), Some(NUCLEO_ACCEPT));
        assert_eq!(headers.get("Date"), Some("Tue, 2 Jan 2024 15:04:05 GMT"));
        assert_eq!(
            headers.get("Authorization"),
            Some("NEATOAPP 083d158fbf503e922e01070ada87f15668996bbf255becac333e0504ab790e76")
        );
    }

    #[test]
    fn same_instant_is_deterministic() {
        assert_eq!(
            sign_at(SERIAL, SECRET, BODY, instant()),
            sign_at(SERIAL, SECRET, BODY, instant())
        );
    }
}
