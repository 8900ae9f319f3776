//! HTTP client for the photo-sharing service.
//!
//! Thin, blocking wrapper over the service's REST endpoints. Rejections are
//! returned with their parsed JSON body so the application layer can extract
//! user-facing messages; transport failures carry a description only. No
//! client-side timeout is applied here.

use crate::application::{ApiError, AuthApi, ContentApi};
use crate::domain::{Comment, Post, PostDetail, SignInResponse, User};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .map_err(|err| ApiError::transport(err.to_string()))?;
        Self::check(response)?
            .json::<T>()
            .map_err(|err| ApiError::transport(format!("invalid response body: {}", err)))
    }

    /// Turns a non-success response into an [`ApiError`] carrying the parsed
    /// body when the server sent JSON.
    fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        match response.json::<Value>() {
            Ok(body) => Err(ApiError::rejection(code, body)),
            Err(_) => Err(ApiError {
                status: Some(code),
                body: None,
                message: format!("request rejected with status {}", code),
            }),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        Self::send(self.http.get(self.url(path)).bearer_auth(token))
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<T, ApiError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::send(request)
    }

    fn count(&self, path: &str, token: &str) -> Result<u64, ApiError> {
        self.get::<u64>(path, token)
    }
}

impl AuthApi for ApiClient {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError> {
        self.post(
            "auth/local",
            None,
            &json!({ "identifier": email, "password": password }),
        )
    }

    fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        // The registration response body is opaque to us; only the status
        // matters.
        let _: Value = self.post(
            "auth/local/register",
            None,
            &json!({ "username": username, "email": email, "password": password }),
        )?;
        Ok(())
    }
}

impl ContentApi for ApiClient {
    fn feed(&self, token: &str) -> Result<Vec<Post>, ApiError> {
        self.get("posts?_sort=created_at:DESC", token)
    }

    fn post_detail(
        &self,
        token: &str,
        post_id: u64,
        viewer_id: u64,
    ) -> Result<PostDetail, ApiError> {
        let post: Post = self.get(&format!("posts/{}", post_id), token)?;
        let likes = self.count(&format!("likes/count?post={}", post_id), token)?;
        let viewer_likes = self.count(
            &format!("likes/count?post={}&user={}", post_id, viewer_id),
            token,
        )?;
        Ok(PostDetail {
            post,
            likes,
            liked_by_viewer: viewer_likes > 0,
        })
    }

    fn create_like(&self, token: &str, user_id: u64, post_id: u64) -> Result<(), ApiError> {
        let _: Value = self.post(
            "likes",
            Some(token),
            &json!({ "user": user_id, "post": post_id }),
        )?;
        Ok(())
    }

    fn comments(&self, token: &str, post_id: u64) -> Result<Vec<Comment>, ApiError> {
        self.get(
            &format!("comments?post={}&_sort=created_at:ASC", post_id),
            token,
        )
    }

    fn create_comment(
        &self,
        token: &str,
        user_id: u64,
        post_id: u64,
        content: &str,
    ) -> Result<Comment, ApiError> {
        self.post(
            "comments",
            Some(token),
            &json!({ "user": user_id, "post": post_id, "content": content }),
        )
    }

    fn update_profile(
        &self,
        token: &str,
        user_id: u64,
        name: &str,
        bio: &str,
    ) -> Result<User, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("users/{}", user_id)))
            .bearer_auth(token)
            .json(&json!({ "profile": { "name": name, "bio": bio } }));
        Self::send(request)
    }

    fn create_post(
        &self,
        token: &str,
        description: &str,
        image_urls: &[String],
    ) -> Result<Post, ApiError> {
        let images: Vec<Value> = image_urls.iter().map(|url| json!({ "url": url })).collect();
        self.post(
            "posts",
            Some(token),
            &json!({ "description": description, "images": images }),
        )
    }
}
