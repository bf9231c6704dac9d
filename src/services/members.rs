use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::ClientError;
use crate::model::{Member, PaginatedResult, Pagination, User, UserParams};

/// The paginated member listing, as seen by the pull-to-refresh controller.
pub trait MemberSource {
    /// Move the page cursor back to the first page.
    fn reset_page_cursor(&self);
    /// Request the page under the cursor. Parameters are captured when this is
    /// called; the request goes out when the returned future is first polled.
    fn fetch(&self) -> LocalBoxFuture<'static, Result<(), ClientError>>;
}

struct Inner {
    client: reqwest::Client,
    api_url: String,
    page_size: u32,
    // Filters for the signed-in user; what "reset filters" returns to.
    defaults: RefCell<UserParams>,
    params: RefCell<UserParams>,
    token: RefCell<Option<String>>,
    result: RefCell<Option<PaginatedResult<Member>>>,
}

#[derive(Clone)]
pub struct MembersService {
    inner: Rc<Inner>,
}

impl PartialEq for MembersService {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MembersService {
    pub fn new(api_url: impl Into<String>, page_size: u32, user: Option<&User>) -> Self {
        Self {
            inner: Rc::new(Inner {
                client: reqwest::Client::new(),
                api_url: api_url.into(),
                page_size,
                defaults: RefCell::new(UserParams::for_user(user, page_size)),
                params: RefCell::new(UserParams::for_user(user, page_size)),
                token: RefCell::new(user.map(|u| u.token.clone())),
                result: RefCell::new(None),
            }),
        }
    }

    /// Swap credentials after login/logout; filters and cache are reset.
    pub fn set_user(&self, user: Option<&User>) {
        *self.inner.token.borrow_mut() = user.map(|u| u.token.clone());
        let defaults = UserParams::for_user(user, self.inner.page_size);
        *self.inner.params.borrow_mut() = defaults.clone();
        *self.inner.defaults.borrow_mut() = defaults;
        *self.inner.result.borrow_mut() = None;
    }

    pub fn user_params(&self) -> UserParams {
        self.inner.params.borrow().clone()
    }

    pub fn set_user_params(&self, params: UserParams) {
        *self.inner.params.borrow_mut() = params;
    }

    pub fn reset_user_params(&self) {
        let defaults = self.inner.defaults.borrow().clone();
        *self.inner.params.borrow_mut() = defaults;
    }

    /// Returns false if already on `page`.
    pub fn set_page(&self, page: u32) -> bool {
        let mut params = self.inner.params.borrow_mut();
        if params.page_number == page {
            return false;
        }
        params.page_number = page;
        true
    }

    pub fn paginated_result(&self) -> Option<PaginatedResult<Member>> {
        self.inner.result.borrow().clone()
    }
}

impl MemberSource for MembersService {
    fn reset_page_cursor(&self) {
        self.inner.params.borrow_mut().page_number = 1;
    }

    fn fetch(&self) -> LocalBoxFuture<'static, Result<(), ClientError>> {
        let inner = self.inner.clone();
        let params = inner.params.borrow().clone();
        let mut req = inner
            .client
            .get(format!("{}users", inner.api_url))
            .query(&params.query());
        if let Some(token) = inner.token.borrow().as_deref() {
            req = req.bearer_auth(token);
        }
        tracing::debug!(page = params.page_number, "fetching members");
        Box::pin(async move {
            let resp = req.send().await?;
            let status = resp.status();
            if !status.is_success() {
                let message = resp.text().await.unwrap_or_default();
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    message,
                });
            }
            let pagination = resp
                .headers()
                .get("Pagination")
                .and_then(|v| v.to_str().ok())
                .map(parse_pagination)
                .transpose()?;
            let items: Vec<Member> = resp.json().await?;
            tracing::debug!(count = items.len(), "members loaded");
            *inner.result.borrow_mut() = Some(PaginatedResult { items, pagination });
            Ok(())
        })
    }
}

pub fn parse_pagination(raw: &str) -> Result<Pagination, ClientError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reset_returns_to_first_page() {
        let svc = MembersService::new("http://localhost/api/", 5, None);
        assert!(svc.set_page(4));
        assert!(!svc.set_page(4));
        svc.reset_page_cursor();
        assert_eq!(svc.user_params().page_number, 1);
    }

    #[test]
    fn reset_filters_returns_to_user_defaults() {
        let user = User {
            username: "lisa".into(),
            known_as: "Lisa".into(),
            token: "t".into(),
            gender: "female".into(),
            photo_url: None,
            roles: vec![],
        };
        let svc = MembersService::new("http://localhost/api/", 5, Some(&user));
        let mut p = svc.user_params();
        p.min_age = 40;
        p.gender = "female".into();
        p.page_number = 3;
        svc.set_user_params(p);
        svc.reset_user_params();
        let p = svc.user_params();
        assert_eq!(p.min_age, 18);
        assert_eq!(p.page_number, 1);
        assert_eq!(p.gender, "male");
    }

    #[test]
    fn bad_pagination_header_is_a_decode_error() {
        assert!(matches!(parse_pagination("nope"), Err(ClientError::Decode(_))));
    }
}
