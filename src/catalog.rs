use serde::Serialize;

/// Catalog entry as the storage layer hands it to analytics: plain data,
/// no ORM rows.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub name: String,
    /// Fixed-length feature vector used by similarity scoring.
    pub features: Vec<f64>,
    pub tags: Vec<String>,
    pub organic: bool,
}

/// Buyer profile as resolved by the account layer.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub username: String,
    pub experience_level: String,
    pub interests: Vec<String>,
    pub garden_size: String,
    pub preferred_products: Vec<String>,
    pub prefers_organic: bool,
}

/// Read-only product/user lookup. Seeded once at startup and shared behind an
/// `Arc`; analytics never mutates it.
pub struct Catalog {
    products: Vec<Product>,
    users: Vec<UserProfile>,
}

impl Catalog {
    pub fn seeded() -> Self {
        Self {
            products: seed_products(),
            users: seed_users(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn user(&self, username: &str) -> Option<&UserProfile> {
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }
}

fn product(name: &str, features: [f64; 5], tags: &[&str], organic: bool) -> Product {
    Product {
        name: name.to_string(),
        features: features.to_vec(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        organic,
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product(
            "Tomatoes",
            [0.90, 0.40, 0.80, 0.60, 0.30],
            &["vegetable", "summer", "beginner", "medium"],
            true,
        ),
        product(
            "Lettuce",
            [0.30, 0.80, 0.50, 0.70, 0.20],
            &["vegetable", "spring", "beginner", "small"],
            true,
        ),
        product(
            "Carrots",
            [0.50, 0.60, 0.40, 0.80, 0.50],
            &["vegetable", "root", "intermediate", "small"],
            false,
        ),
        product(
            "Cucumbers",
            [0.85, 0.45, 0.75, 0.55, 0.35],
            &["vegetable", "summer", "beginner", "medium"],
            false,
        ),
        product(
            "Peppers",
            [0.80, 0.30, 0.90, 0.50, 0.40],
            &["vegetable", "summer", "intermediate", "medium"],
            true,
        ),
        product(
            "Squash",
            [0.70, 0.50, 0.60, 0.40, 0.60],
            &["vegetable", "autumn", "beginner", "large"],
            false,
        ),
        product(
            "Strawberries",
            [0.60, 0.90, 0.30, 0.90, 0.10],
            &["fruit", "spring", "intermediate", "small"],
            true,
        ),
        product(
            "Herbs",
            [0.20, 0.70, 0.20, 0.60, 0.15],
            &["herb", "container", "beginner", "small"],
            true,
        ),
        product(
            "Onions",
            [0.40, 0.50, 0.45, 0.70, 0.55],
            &["vegetable", "root", "expert", "medium"],
            false,
        ),
        product(
            "Potatoes",
            [0.45, 0.55, 0.50, 0.75, 0.60],
            &["vegetable", "root", "beginner", "large"],
            false,
        ),
    ]
}

fn seed_users() -> Vec<UserProfile> {
    vec![
        UserProfile {
            username: "greenthumb".to_string(),
            experience_level: "expert".to_string(),
            interests: vec!["root".to_string(), "vegetable".to_string()],
            garden_size: "large".to_string(),
            preferred_products: vec!["Potatoes".to_string()],
            prefers_organic: false,
        },
        UserProfile {
            username: "sprout".to_string(),
            experience_level: "beginner".to_string(),
            interests: vec!["herb".to_string(), "container".to_string()],
            garden_size: "small".to_string(),
            preferred_products: vec!["Herbs".to_string()],
            prefers_organic: true,
        },
    ]
}
