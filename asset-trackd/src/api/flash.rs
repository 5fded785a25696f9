//! One-shot notices carried across redirects in a signed cookie. Notices queue
//! up until a page renders them, so a chain of redirects shows every message.

use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use sha2::{Digest, Sha512};
use shared::protocol::{
    MSG_INSPECTED, MSG_INSTALLED, MSG_NO_QR, MSG_NO_RECORD, MSG_NO_RECORD_FOR_QR,
    MSG_RECORD_NOT_FOUND,
};

pub const NOTICE_COOKIE: &str = "notice";

const SEPARATOR: &str = ":";

/// Oldest notices are dropped past this
const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Success,
    Warning,
    Danger,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Warning => "warning",
            Category::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoRecord,
    NoRecordForQr,
    NoQr,
    RecordNotFound,
    Installed,
    Inspected,
}

impl Notice {
    const ALL: [Notice; 6] = [
        Notice::NoRecord,
        Notice::NoRecordForQr,
        Notice::NoQr,
        Notice::RecordNotFound,
        Notice::Installed,
        Notice::Inspected,
    ];

    /// Cookie payload
    pub fn code(self) -> &'static str {
        match self {
            Notice::NoRecord => "no-record",
            Notice::NoRecordForQr => "no-record-qr",
            Notice::NoQr => "no-qr",
            Notice::RecordNotFound => "not-found",
            Notice::Installed => "installed",
            Notice::Inspected => "inspected",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NoRecord => MSG_NO_RECORD,
            Notice::NoRecordForQr => MSG_NO_RECORD_FOR_QR,
            Notice::NoQr => MSG_NO_QR,
            Notice::RecordNotFound => MSG_RECORD_NOT_FOUND,
            Notice::Installed => MSG_INSTALLED,
            Notice::Inspected => MSG_INSPECTED,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Notice::NoRecord | Notice::NoRecordForQr | Notice::RecordNotFound => Category::Danger,
            Notice::NoQr => Category::Warning,
            Notice::Installed | Notice::Inspected => Category::Success,
        }
    }
}

/// Cookie signing key derived from the configured session secret
pub fn signing_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

fn decode(value: &str) -> Vec<Notice> {
    value
        .split(SEPARATOR)
        .filter_map(Notice::from_code)
        .collect()
}

fn encode(notices: &[Notice]) -> String {
    let skip = notices.len().saturating_sub(MAX_QUEUED);
    notices[skip..]
        .iter()
        .map(|n| n.code())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Queue a notice behind any still pending for the next rendered page
pub fn push(jar: SignedCookieJar, notice: Notice) -> SignedCookieJar {
    let mut queued = jar
        .get(NOTICE_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default();
    queued.push(notice);

    jar.add(
        Cookie::build((NOTICE_COOKIE, encode(&queued)))
            .path("/")
            .http_only(true),
    )
}

/// Pop every pending notice, oldest first. Tampered cookies and unknown codes
/// are dropped.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<Notice>) {
    match jar.get(NOTICE_COOKIE) {
        Some(cookie) => {
            let notices = decode(cookie.value());
            (jar.remove(Cookie::build(NOTICE_COOKIE).path("/")), notices)
        }
        None => (jar, Vec::new()),
    }
}
