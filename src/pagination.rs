use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `page`/`limit` query parameters. Kept as strings so that garbage
/// falls back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1 (default 1)
    #[param(value_type = Option<u64>)]
    pub page: Option<String>,
    /// Page size (default 10)
    #[param(value_type = Option<u64>)]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn skip(&self) -> usize {
        let skip = (self.page - 1).saturating_mul(self.limit);
        usize::try_from(skip).unwrap_or(usize::MAX)
    }

    pub fn take(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    pub fn paginate<T>(&self, total: u64, data: Vec<T>) -> Paginated<T> {
        Paginated {
            total,
            total_pages: self.total_pages(total),
            current_page: self.page,
            data,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl From<&PageQuery> for PageRequest {
    fn from(query: &PageQuery) -> Self {
        Self::new(
            parse_leading_int(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            parse_leading_int(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        )
    }
}

/// A slice of a result set plus the metadata describing where it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            total: self.total,
            total_pages: self.total_pages,
            current_page: self.current_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Reads the leading run of digits after an optional `+`, so `"3abc"` and
/// `"+3"` are 3. Negative numbers, empty input and zero yield `None`.
fn parse_leading_int(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageRequest {
        PageRequest::from(&PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        })
    }

    #[test]
    fn defaults_when_absent_or_garbage() {
        assert_eq!(query(None, None), PageRequest::new(1, 10));
        assert_eq!(query(Some("abc"), Some("")), PageRequest::new(1, 10));
        assert_eq!(query(Some("0"), Some("-5")), PageRequest::new(1, 10));
    }

    #[test]
    fn accepts_leading_digits() {
        assert_eq!(query(Some("3abc"), Some(" 25")), PageRequest::new(3, 25));
    }

    #[test]
    fn accepts_one_plus_sign() {
        assert_eq!(query(Some("+3"), Some(" +20")), PageRequest::new(3, 20));
        assert_eq!(query(Some("++3"), Some("+-2")), PageRequest::new(1, 10));
        assert_eq!(query(Some("-3"), Some("+")), PageRequest::new(1, 10));
    }

    #[test]
    fn skip_and_total_pages() {
        let request = PageRequest::new(3, 4);
        assert_eq!(request.skip(), 8);
        assert_eq!(request.total_pages(0), 0);
        assert_eq!(request.total_pages(8), 2);
        assert_eq!(request.total_pages(9), 3);
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        let request = PageRequest::new(u64::MAX, u64::MAX);
        assert_eq!(request.skip(), usize::MAX);
    }

    #[test]
    fn paginate_fills_metadata() {
        let page = PageRequest::new(2, 3).paginate(7, vec!["d", "e", "f"]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.map(str::len).data, vec![1, 1, 1]);
    }
}
