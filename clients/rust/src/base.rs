use reqwest::{header::RETRY_AFTER, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
    client: Client,
}

#[derive(Debug, PartialEq)]
pub enum APIError {
    Network,
    MalformedResponse,
    BadClientData,
    NotFound,
    Conflict,
    /// The coupon is in cooldown, retry after the given amount of seconds
    TooManyRequests(Option<u64>),
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            address,
            client: Client::new(),
        }
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let url = format!("{}/{}", self.address, path);
        self.client.request(method, &url)
    }

    fn check_status_code(
        &self,
        res: &Response,
        expected_status_codes: &[StatusCode],
    ) -> Result<(), APIError> {
        let status = res.status();
        if expected_status_codes.contains(&status) {
            return Ok(());
        }
        Err(match status {
            StatusCode::BAD_REQUEST => APIError::BadClientData,
            StatusCode::NOT_FOUND => APIError::NotFound,
            StatusCode::CONFLICT => APIError::Conflict,
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = res
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|val| val.to_str().ok())
                    .and_then(|val| val.parse::<u64>().ok());
                APIError::TooManyRequests(retry_after)
            }
            _ => APIError::UnexpectedStatusCode(status),
        })
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
        expected_status_codes: &[StatusCode],
    ) -> APIResponse<T> {
        self.check_status_code(&res, expected_status_codes)?;
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_codes: &[StatusCode],
    ) -> APIResponse<T> {
        let res = match self.get_client(Method::GET, path).send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, expected_status_codes).await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_codes: &[StatusCode],
    ) -> APIResponse<T> {
        let res = match self.get_client(Method::POST, path).json(&body).send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, expected_status_codes).await
    }
}
