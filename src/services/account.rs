use crate::error::ClientError;
use crate::model::{LoginRequest, RegisterRequest, User};
use crate::util;

const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct AccountService {
    client: reqwest::Client,
    api_url: String,
}

impl PartialEq for AccountService {
    fn eq(&self, other: &Self) -> bool {
        self.api_url == other.api_url
    }
}

impl AccountService {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<User, ClientError> {
        self.post_for_user("account/login", req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ClientError> {
        self.post_for_user("account/register", req).await
    }

    async fn post_for_user<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<User, ClientError> {
        let resp = self
            .client
            .post(format!("{}{}", self.api_url, path))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let user: User = resp.json().await?;
        if let Err(e) = util::save_json(USER_KEY, &user) {
            tracing::warn!(error = %e, "could not persist session");
        }
        tracing::info!(user = %user.username, "signed in");
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        match util::load_json::<User>(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "stored session unreadable");
                None
            }
        }
    }

    pub fn logout(&self) {
        if let Err(e) = util::remove_key(USER_KEY) {
            tracing::warn!(error = %e, "could not clear session");
        }
    }
}
