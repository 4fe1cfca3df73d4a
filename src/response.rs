use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct Meta {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
    pub has_next_page: Option<bool>,
    pub has_prev_page: Option<bool>,
}

impl Meta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages),
            has_next_page: Some(page < total_pages),
            has_prev_page: Some(page > 1),
        }
    }

    /// Metadata for an unpaginated listing.
    pub fn total(total: u64) -> Self {
        Self {
            total: Some(total),
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
            has_next_page: None,
            has_prev_page: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Meta;

    #[test]
    fn last_page_has_no_next() {
        // 45 rows, 20 per page: page 3 holds the remaining 5.
        let meta = Meta::new(3, 20, 45);
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(meta.has_next_page, Some(false));
        assert_eq!(meta.has_prev_page, Some(true));
    }

    #[test]
    fn first_page_of_many() {
        let meta = Meta::new(1, 10, 25);
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(meta.has_next_page, Some(true));
        assert_eq!(meta.has_prev_page, Some(false));
    }

    #[test]
    fn empty_dataset() {
        let meta = Meta::new(1, 20, 0);
        assert_eq!(meta.total_pages, Some(0));
        assert_eq!(meta.has_next_page, Some(false));
    }
}
