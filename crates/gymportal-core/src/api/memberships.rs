use serde_json::{json, Value};

use super::client::segment;
use super::{ApiClient, ApiError};
use crate::models::{Membership, MembershipUpdate, NewMembership};

impl ApiClient {
    pub async fn fetch_memberships(&self) -> Result<Vec<Membership>, ApiError> {
        self.get("/memberships").await
    }

    pub async fn fetch_membership(&self, id: &str) -> Result<Membership, ApiError> {
        self.get(&format!("/memberships/{}", segment(id))).await
    }

    pub async fn fetch_user_memberships(&self, user_id: &str) -> Result<Vec<Membership>, ApiError> {
        self.get(&format!("/memberships/user/{}", segment(user_id))).await
    }

    pub async fn create_membership(&self, membership: &NewMembership) -> Result<Membership, ApiError> {
        self.post("/memberships", membership).await
    }

    pub async fn update_membership(&self, id: &str, update: &MembershipUpdate) -> Result<Membership, ApiError> {
        self.patch(&format!("/memberships/{}", segment(id)), update).await
    }

    pub async fn delete_membership(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/memberships/{}", segment(id))).await?;
        Ok(())
    }

    pub async fn renew_membership(&self, id: &str) -> Result<Membership, ApiError> {
        self.post(&format!("/memberships/{}/renew", segment(id)), &json!({})).await
    }

    /// Ask the backend to expire memberships past their end date.
    pub async fn check_expired_memberships(&self) -> Result<Value, ApiError> {
        self.post_empty("/memberships/check-expired").await
    }

    pub async fn set_auto_renew(&self, id: &str, auto_renew: bool) -> Result<Membership, ApiError> {
        self.patch(
            &format!("/memberships/{}", segment(id)),
            &json!({ "auto_renew": auto_renew }),
        )
        .await
    }
}
