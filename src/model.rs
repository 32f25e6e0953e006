// Wire schema for the two VK API methods we call. Field names mirror the
// JSON documented at https://vk.com/dev/objects/photo.

use serde::{Deserialize, Serialize};

/// Value of `response` in a successful `photos.delete` reply.
pub const DELETE_SUCCESS: i64 = 1;

/// Envelope returned by `photos.get`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse {
    pub response: Window,
}

/// One page of photos plus the size of the whole album at the time of the
/// call. `count` is re-read on every page, so it shrinks as photos are
/// deleted.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Window {
    pub count: u64,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A remote photo record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub album_id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub sizes: Vec<Variant>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub date: i64,
}

/// One rendition of a photo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Variant {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Variant {
    pub fn dimension_sum(&self) -> u64 {
        u64::from(self.width) + u64::from(self.height)
    }
}

/// Envelope returned by `photos.delete`. A missing `response` decodes as 0
/// so an error envelope is reported as a rejection, not a decode failure.
/// `error` only feeds the diagnostic message.
#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteResponse {
    #[serde(default)]
    pub response: i64,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code, self.error_msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_photos_get_payload() {
        let body = r#"{"response":{"count":2,"items":[
            {"id":457239017,"album_id":-15,"owner_id":59233038,
             "sizes":[{"type":"s","url":"https://sun9-1.userapi.com/a/s.jpg","width":75,"height":56},
                      {"type":"z","url":"https://sun9-1.userapi.com/a/z.jpg","width":1280,"height":960}],
             "text":"","date":1546300800}]}}"#;
        let parsed: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response.count, 2);
        let item = &parsed.response.items[0];
        assert_eq!(item.id, 457239017);
        assert_eq!(item.album_id, -15);
        assert_eq!(item.sizes[1].kind, "z");
        assert_eq!(item.sizes[1].dimension_sum(), 2240);
    }

    #[test]
    fn delete_error_envelope_is_not_success() {
        let body = r#"{"error":{"error_code":15,"error_msg":"Access denied"}}"#;
        let parsed: DeleteResponse = serde_json::from_str(body).unwrap();
        assert_ne!(parsed.response, DELETE_SUCCESS);
        assert_eq!(parsed.error.unwrap().to_string(), "15: Access denied");
    }

    #[test]
    fn list_without_response_is_rejected() {
        let body = r#"{"error":{"error_code":5,"error_msg":"User authorization failed"}}"#;
        assert!(serde_json::from_str::<ListResponse>(body).is_err());
    }
}
