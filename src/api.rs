// API client module: a small blocking HTTP client for the two VK methods a
// run needs, `photos.get` and `photos.delete`. Every call is synchronous;
// the drivers issue one request at a time.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{DeleteResponse, ListResponse, Window, DELETE_SUCCESS};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.vk.com/method";
pub const DEFAULT_API_VERSION: &str = "5.92";

/// The remote operations the pagination and deletion drivers depend on.
pub trait PhotoApi {
    /// Fetch `count` photos of `album` starting at `offset`, together with
    /// the album's current total.
    fn list(&self, album: &str, owner_id: i64, count: u32, offset: u64) -> Result<Window>;

    /// Delete one photo. Not idempotent: deleting a photo twice is reported
    /// as a failure by the remote side.
    fn delete(&self, owner_id: i64, item_id: i64) -> Result<()>;
}

/// VK REST client holding a reqwest blocking client, the method base URL,
/// the API version literal and the access token sent with every call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    version: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, version: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::transport("client setup", e))?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.to_string(),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, &config.api_version, &config.access_token)
    }

    /// The underlying HTTP client, shared with the download sink so a run
    /// keeps a single connection pool.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// GET `{base}/{method}` with the common auth parameters and decode the
    /// body as `T`. The body is read as text first so that transport and
    /// decoding failures stay distinguishable.
    fn call<T: DeserializeOwned>(&self, method: &'static str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "calling VK API");
        let res = self
            .client
            .get(&url)
            .query(&[("access_token", self.token.as_str()), ("v", self.version.as_str())])
            .query(params)
            .send()
            .map_err(|e| Error::transport(method, e))?;
        let body = res.text().map_err(|e| Error::transport(method, e))?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            operation: method,
            source,
        })
    }
}

impl PhotoApi for ApiClient {
    fn list(&self, album: &str, owner_id: i64, count: u32, offset: u64) -> Result<Window> {
        let parsed: ListResponse = self.call(
            "photos.get",
            &[
                ("album_id", album.to_string()),
                ("owner_id", owner_id.to_string()),
                ("count", count.to_string()),
                ("offset", offset.to_string()),
            ],
        )?;
        Ok(parsed.response)
    }

    fn delete(&self, owner_id: i64, item_id: i64) -> Result<()> {
        let parsed: DeleteResponse = self.call(
            "photos.delete",
            &[
                ("owner_id", owner_id.to_string()),
                ("photo_id", item_id.to_string()),
            ],
        )?;
        if parsed.response != DELETE_SUCCESS {
            return Err(Error::Api {
                operation: "photos.delete",
                response: parsed.response,
                detail: parsed.error.map(|e| e.to_string()),
            });
        }
        Ok(())
    }
}
