//! Collection counts, the one status view the app exposes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub blogs: usize,
    pub blog_entries: usize,
    pub tags: usize,
}

impl CollectionCounts {
    pub fn total(&self) -> usize {
        self.blogs + self.blog_entries + self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_field_names() {
        let counts = CollectionCounts {
            blogs: 1,
            blog_entries: 2,
            tags: 3,
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["blog_entries"], 2);
        assert_eq!(counts.total(), 6);
    }
}
