use serde::{Deserialize, Serialize};

/// A blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, alias = "date", alias = "published_at")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub views: Option<u64>,
}

impl BlogPost {
    /// Title, excerpt or any tag contains the query (case-insensitive).
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q)
            || self.excerpt.to_lowercase().contains(&q)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
    }

    pub fn in_category(&self, category: Option<&str>) -> bool {
        match category {
            None => true,
            Some(c) => self.category.as_deref() == Some(c),
        }
    }
}

/// Distinct categories in first-seen order.
pub fn categories(posts: &[BlogPost]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in posts.iter().filter_map(|p| p.category.as_ref()) {
        if !out.contains(c) {
            out.push(c.clone());
        }
    }
    out
}

/// Body of `POST /blog` and `PATCH /blog/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogPostInput {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
