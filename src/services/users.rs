//! User administration and own-profile operations

use std::sync::Arc;

use validator::Validate;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::{CreateAdminUser, Envelope, Page, Profile, UpdateAdminUser, UpdateProfile};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct UsersService {
    http: HttpClient,
    store: Arc<SessionStore>,
}

impl UsersService {
    pub fn new(http: HttpClient, store: Arc<SessionStore>) -> Self {
        Self { http, store }
    }

    /// List user accounts (admin only).
    pub async fn list(&self) -> ApiResult<Page<Profile>> {
        self.http
            .get::<Envelope<Vec<Profile>>>("/admin/users")
            .await?
            .into_page()
    }

    pub async fn get(&self, id: i64) -> ApiResult<Profile> {
        self.http
            .get::<Envelope<Profile>>(&format!("/admin/users/{id}"))
            .await?
            .into_result()
    }

    pub async fn create(&self, user: &CreateAdminUser) -> ApiResult<Profile> {
        user.validate()?;
        self.http
            .post::<Envelope<Profile>, _>("/admin/users", user)
            .await?
            .into_result()
    }

    pub async fn update(&self, id: i64, user: &UpdateAdminUser) -> ApiResult<Profile> {
        user.validate()?;
        self.http
            .put::<Envelope<Profile>, _>(&format!("/admin/users/{id}"), user)
            .await?
            .into_result()
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.http
            .delete::<Envelope<serde_json::Value>>(&format!("/admin/users/{id}"))
            .await?
            .ensure_success()
    }

    /// Update the authenticated user's own profile and refresh the
    /// session store's cached copy with the server's response.
    pub async fn update_profile(&self, update: &UpdateProfile) -> ApiResult<Profile> {
        update.validate()?;
        let user = self
            .http
            .put::<Envelope<Profile>, _>("/user/profile", update)
            .await?
            .into_result()?;

        self.store.update_profile(&user);
        Ok(user)
    }
}
