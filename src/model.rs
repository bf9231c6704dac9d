//! Data shapes exchanged with the API. Field names follow the server's camelCase JSON.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub known_as: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Contents of the `Pagination` response header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub known_as: String,
    pub token: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderBy {
    LastActive,
    Created,
}

impl OrderBy {
    pub fn as_query(self) -> &'static str {
        match self {
            OrderBy::LastActive => "lastActive",
            OrderBy::Created => "created",
        }
    }
}

/// Filter and page cursor for the member listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserParams {
    pub gender: String,
    pub min_age: u32,
    pub max_age: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub order_by: OrderBy,
}

impl UserParams {
    /// Defaults to showing the opposite gender of the signed-in user, as the API does.
    pub fn for_user(user: Option<&User>, page_size: u32) -> Self {
        let gender = match user.map(|u| u.gender.as_str()) {
            Some("female") => "male",
            _ => "female",
        };
        Self {
            gender: gender.to_string(),
            min_age: 18,
            max_age: 99,
            page_number: 1,
            page_size,
            order_by: OrderBy::LastActive,
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("minAge", self.min_age.to_string()),
            ("maxAge", self.max_age.to_string()),
            ("gender", self.gender.clone()),
            ("orderBy", self.order_by.as_query().to_string()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub known_as: String,
    pub gender: String,
    pub date_of_birth: String,
    pub city: String,
    pub country: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_header_parses() {
        let p: Pagination =
            serde_json::from_str(r#"{"currentPage":2,"itemsPerPage":5,"totalItems":11,"totalPages":3}"#).unwrap();
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn params_default_to_opposite_gender() {
        let user = User {
            username: "lisa".into(),
            known_as: "Lisa".into(),
            token: "t".into(),
            gender: "female".into(),
            photo_url: None,
            roles: vec![],
        };
        assert_eq!(UserParams::for_user(Some(&user), 5).gender, "male");
        assert_eq!(UserParams::for_user(None, 5).gender, "female");
    }

    #[test]
    fn query_carries_cursor_and_filters() {
        let mut params = UserParams::for_user(None, 10);
        params.page_number = 3;
        let q = params.query();
        assert!(q.contains(&("pageNumber", "3".to_string())));
        assert!(q.contains(&("orderBy", "lastActive".to_string())));
    }
}
