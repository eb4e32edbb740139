//! REST adapter for the user-records service.
//!
//! The screen never talks HTTP directly; it calls [`UserService`], and
//! [`ApiClient`] is the one implementation that exists outside of tests.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};

/// Seconds before an in-flight request is abandoned. Requests are issued
/// from the event loop, so a hung server would otherwise freeze the screen.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A user record as the API serves it: exactly these three fields, all
/// strings, `id` assigned by whoever talks to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The operations the screen needs from the user-records service.
pub trait UserService {
    fn list_users(&self) -> Result<Vec<User>>;
    fn create_user(&self, user: &User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;
    fn delete_user(&self, id: &str) -> Result<()>;
}

/// Blocking HTTP client for the REST API at `base_url`.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

impl UserService for ApiClient {
    fn list_users(&self) -> Result<Vec<User>> {
        debug!(url = %self.users_url(), "GET users");
        let resp = self.http.get(self.users_url()).send()?;
        let users = check(resp)?.json::<Vec<User>>()?;
        Ok(users)
    }

    fn create_user(&self, user: &User) -> Result<()> {
        debug!(id = %user.id, "POST user");
        let resp = self.http.post(self.users_url()).json(user).send()?;
        check(resp)?;
        Ok(())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        debug!(id = %user.id, "PUT user");
        let resp = self.http.put(self.user_url(&user.id)).json(user).send()?;
        check(resp)?;
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<()> {
        debug!(id = %id, "DELETE user");
        let resp = self.http.delete(self.user_url(id)).send()?;
        check(resp)?;
        Ok(())
    }
}

/// Map a non-2xx response to [`AppError::Status`], keeping whatever the
/// server put in the body as the message.
fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .text()
        .unwrap_or_else(|_| "<failed to read response body>".to_string());
    Err(AppError::Status {
        status: status.as_u16(),
        message,
    })
}
