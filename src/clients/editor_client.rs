/// 图片编辑器后端 API 客户端
///
/// 封装所有与后端接口相关的 HTTP 细节：地址拼接、防伪令牌请求头、状态码检查
use crate::clients::csrf::extract_csrf_token;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 防伪令牌请求头
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// 后端接口路径
pub mod endpoints {
    pub const IMAGE_CONVERT: &str = "/api/image_convert/";
    pub const LIST_CONVERTED: &str = "/api/image_download_converted/";
    pub const DELETE_CONVERTED: &str = "/api/image_delete_converted/";
    pub const DOWNLOAD_ALL_CONVERTED: &str = "/api/download_all_converted/";
    pub const IMAGE_DOWNLOAD: &str = "/api/image_download/";
    pub const IMAGE_SAVE: &str = "/api/image_save/";
    pub const IMAGE_GET_ORIGINAL: &str = "/api/image_get_original/";
}

/// 后端 API 客户端
///
/// 内部的 `reqwest::Client` 使用 Arc，clone 开销很小
#[derive(Clone, Debug)]
pub struct EditorClient {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl EditorClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// 拼接完整地址
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 绝对地址原样返回，相对地址拼接到服务地址后
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            self.build_url(url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// 访问页面并从中提取防伪令牌
    ///
    /// 客户端开启了 cookie 存储，页面下发的 csrftoken cookie 会随后续请求一起发送
    pub async fn bootstrap_csrf_token(&mut self, page_path: &str) -> AppResult<String> {
        if let Some(token) = &self.csrf_token {
            debug!("使用配置中的 CSRF 令牌");
            return Ok(token.clone());
        }

        let url = self.build_url(page_path);
        debug!("正在从页面提取 CSRF 令牌: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(page_path, e))?;
        let response = Self::ensure_success(page_path, response).await?;
        let html = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(page_path, e))?;

        let token = extract_csrf_token(&html).ok_or_else(|| ApiError::CsrfTokenNotFound {
            page: page_path.to_string(),
        })?;
        self.csrf_token = Some(token.clone());
        Ok(token)
    }

    /// 为发往后端的请求附加防伪令牌
    fn apply_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => request.header(CSRF_HEADER, token.as_str()),
            None => request,
        }
    }

    /// GET 请求并解析 JSON
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let request = self
            .client
            .get(self.build_url(endpoint))
            .header("Content-Type", "application/json");
        let response = self.send(endpoint, self.apply_csrf(request)).await?;
        let response = Self::ensure_success(endpoint, response).await?;
        Self::parse_json(endpoint, response).await
    }

    /// POST JSON 请求体并解析 JSON 响应
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(endpoint)).json(body);
        let response = self.send(endpoint, self.apply_csrf(request)).await?;
        let response = Self::ensure_success(endpoint, response).await?;
        Self::parse_json(endpoint, response).await
    }

    /// POST multipart 表单，返回原始响应，由调用方判断状态码
    pub async fn post_multipart(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> AppResult<Response> {
        let request = self.client.post(self.build_url(endpoint)).multipart(form);
        self.send(endpoint, self.apply_csrf(request)).await
    }

    /// GET 后端接口，返回响应头和响应体
    pub async fn get_bytes(&self, endpoint: &str) -> AppResult<(HeaderMap, Vec<u8>)> {
        let request = self.client.get(self.build_url(endpoint));
        let response = self.send(endpoint, self.apply_csrf(request)).await?;
        let response = Self::ensure_success(endpoint, response).await?;
        let headers = response.headers().clone();
        let bytes = Self::read_bytes(endpoint, response).await?;
        Ok((headers, bytes))
    }

    /// 下载任意地址的文件（例如 CDN 上的已转换图片）
    ///
    /// 不附加防伪令牌；只有 200 视为成功
    pub async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let url = self.resolve_url(url);
        let response = self.send(&url, self.client.get(&url)).await?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!("下载失败 ({}): HTTP {}", url, status);
            return Err(AppError::bad_response(url, status, None));
        }

        Self::read_bytes(&url, response).await
    }

    /// 读取完整响应体
    pub async fn read_bytes(endpoint: &str, response: Response) -> AppResult<Vec<u8>> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        debug!("{} → HTTP {}", endpoint, response.status());
        Ok(response)
    }

    /// 非 2xx 响应转换为 `ApiError::BadResponse`，尽量带上服务端的 `error` 字段
    pub async fn ensure_success(endpoint: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = Self::extract_error_message(&body);
        warn!("API 返回错误 ({}): HTTP {} {:?}", endpoint, status, message);
        Err(AppError::bad_response(endpoint, status.as_u16(), message))
    }

    /// 从错误响应体中取出 `error` 或 `message` 字段
    pub fn extract_error_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    async fn parse_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> AppResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}
