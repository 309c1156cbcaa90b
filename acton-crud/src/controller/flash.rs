//! One-shot flash messages carried across a redirect in a cookie
//!
//! The cookie stores a message key only; the text comes from the
//! configured [`MessageSettings`] when the next page renders.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::config::MessageSettings;

/// Flash cookie name
pub const FLASH_COOKIE_NAME: &str = "acton_crud_flash";

/// Seconds until an unread flash expires
const FLASH_MAX_AGE_SECS: u32 = 60;

/// Outcome messages set by the CRUD actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    /// Entity created
    Created,
    /// Entity updated
    Updated,
    /// Entity deleted
    Destroyed,
    /// Deletion refused because of dependents
    DestroyBlocked,
}

impl Flash {
    /// Cookie value
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Destroyed => "destroyed",
            Self::DestroyBlocked => "destroy_blocked",
        }
    }

    /// Parse a cookie value
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "destroyed" => Some(Self::Destroyed),
            "destroy_blocked" => Some(Self::DestroyBlocked),
            _ => None,
        }
    }

    /// CSS modifier: `alert` for failures, `notice` otherwise
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::DestroyBlocked => "alert",
            Self::Created | Self::Updated | Self::Destroyed => "notice",
        }
    }

    /// Configured text of this message
    #[must_use]
    pub fn message(self, messages: &MessageSettings) -> &str {
        match self {
            Self::Created => &messages.created,
            Self::Updated => &messages.updated,
            Self::Destroyed => &messages.destroyed,
            Self::DestroyBlocked => &messages.destroy_blocked,
        }
    }

    /// Read the flash from request cookies
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|cookie| cookie.trim().split_once('='))
            .find(|(name, _)| name.trim() == FLASH_COOKIE_NAME)
            .and_then(|(_, value)| Self::from_key(value.trim()))
    }

    /// `Set-Cookie` value storing this flash
    #[must_use]
    pub fn set_cookie(self) -> String {
        format!(
            "{FLASH_COOKIE_NAME}={}; Path=/; Max-Age={FLASH_MAX_AGE_SECS}; SameSite=Lax; HttpOnly",
            self.key()
        )
    }

    /// Append the flash cookie to response headers
    pub fn write_to(self, headers: &mut HeaderMap) {
        if let Ok(value) = self.set_cookie().parse() {
            headers.append(SET_COOKIE, value);
        }
    }
}

/// Expire the flash cookie after it has been shown
pub fn clear_flash(headers: &mut HeaderMap) {
    headers.append(
        SET_COOKIE,
        HeaderValue::from_static("acton_crud_flash=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for flash in [Flash::Created, Flash::Updated, Flash::Destroyed, Flash::DestroyBlocked] {
            assert_eq!(Flash::from_key(flash.key()), Some(flash));
        }
        assert_eq!(Flash::from_key("bogus"), None);
    }

    #[test]
    fn test_kind_and_message() {
        let messages = MessageSettings::default();
        assert_eq!(Flash::Created.kind(), "notice");
        assert_eq!(Flash::DestroyBlocked.kind(), "alert");
        assert_eq!(
            Flash::Destroyed.message(&messages),
            "The entry was successfully deleted."
        );
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; acton_crud_flash=updated; other=1"),
        );
        assert_eq!(Flash::from_headers(&headers), Some(Flash::Updated));
        assert_eq!(Flash::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_set_and_clear_cookie() {
        let mut headers = HeaderMap::new();
        Flash::DestroyBlocked.write_to(&mut headers);
        clear_flash(&mut headers);

        let cookies: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies[0].starts_with("acton_crud_flash=destroy_blocked;"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[1].contains("Max-Age=0"));
    }
}
