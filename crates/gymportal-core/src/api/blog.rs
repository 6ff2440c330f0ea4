use serde_json::{json, Value};

use super::client::segment;
use super::{ApiClient, ApiError};
use crate::models::{BlogPost, BlogPostInput};

impl ApiClient {
    /// Published posts only.
    pub async fn fetch_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get("/blog").await
    }

    /// Drafts included; admin only.
    pub async fn fetch_all_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get("/blog/all").await
    }

    pub async fn fetch_post(&self, id: &str) -> Result<BlogPost, ApiError> {
        self.get(&format!("/blog/{}", segment(id))).await
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.get(&format!("/blog/slug/{}", segment(slug))).await
    }

    pub async fn fetch_posts_by_tag(&self, tag: &str) -> Result<Vec<BlogPost>, ApiError> {
        self.get(&format!("/blog/tag/{}", segment(tag))).await
    }

    pub async fn fetch_tags(&self) -> Result<Vec<String>, ApiError> {
        self.get("/blog/tags").await
    }

    pub async fn create_post(&self, post: &BlogPostInput) -> Result<BlogPost, ApiError> {
        self.post("/blog", post).await
    }

    pub async fn update_post(&self, id: &str, post: &BlogPostInput) -> Result<BlogPost, ApiError> {
        self.patch(&format!("/blog/{}", segment(id)), post).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/blog/{}", segment(id))).await?;
        Ok(())
    }

    pub async fn publish_post(&self, id: &str) -> Result<BlogPost, ApiError> {
        self.post(&format!("/blog/{}/publish", segment(id)), &json!({})).await
    }

    pub async fn unpublish_post(&self, id: &str) -> Result<BlogPost, ApiError> {
        self.post(&format!("/blog/{}/unpublish", segment(id)), &json!({})).await
    }
}
