use super::error::FilterError;

/// Sentinel for "not constrained".
pub const UNBOUNDED: i32 = -1;

/// Limit/offset window. Both default to [`UNBOUNDED`]; an offset is only
/// ever recorded alongside an explicit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i32,
    pub offset: i32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self { limit: UNBOUNDED, offset: UNBOUNDED }
    }
}

impl PageWindow {
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Result<Self, FilterError> {
        let mut window = Self::default();

        let Some(limit) = limit else {
            return Ok(window);
        };
        window.limit = match limit.parse::<i32>() {
            Ok(l) if l > 0 => l,
            _ => return Err(FilterError::InvalidLimit),
        };

        if let Some(offset) = offset {
            window.offset = match offset.parse::<i32>() {
                Ok(o) if o >= 0 => o,
                _ => return Err(FilterError::InvalidOffset),
            };
        }

        Ok(window)
    }

    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.limit).ok()
    }

    pub fn offset(&self) -> Option<usize> {
        if self.limit == UNBOUNDED {
            return None;
        }
        usize::try_from(self.offset).ok()
    }

    pub fn to_sql(&self) -> String {
        match (self.limit(), self.offset()) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_without_limit() {
        let w = PageWindow::from_params(None, None).unwrap();
        assert_eq!(w, PageWindow { limit: -1, offset: -1 });
        assert_eq!(w.to_sql(), "");
    }

    #[test]
    fn offset_is_ignored_without_limit() {
        let w = PageWindow::from_params(None, Some("5")).unwrap();
        assert_eq!(w, PageWindow { limit: -1, offset: -1 });
        // Not even validated.
        let w = PageWindow::from_params(None, Some("-9")).unwrap();
        assert_eq!(w.offset(), None);
    }

    #[test]
    fn limit_and_offset() {
        let w = PageWindow::from_params(Some("10"), Some("5")).unwrap();
        assert_eq!(w, PageWindow { limit: 10, offset: 5 });
        assert_eq!(w.to_sql(), "LIMIT 10 OFFSET 5");
    }

    #[test]
    fn limit_without_offset_keeps_sentinel() {
        let w = PageWindow::from_params(Some("3"), None).unwrap();
        assert_eq!(w, PageWindow { limit: 3, offset: -1 });
        assert_eq!(w.offset(), None);
        assert_eq!(w.to_sql(), "LIMIT 3");
    }

    #[test]
    fn rejects_bad_limit() {
        for bad in ["0", "-1", "ten", "99999999999"] {
            assert_eq!(PageWindow::from_params(Some(bad), None), Err(FilterError::InvalidLimit), "{bad}");
        }
    }

    #[test]
    fn rejects_bad_offset() {
        for bad in ["-1", "x"] {
            assert_eq!(PageWindow::from_params(Some("1"), Some(bad)), Err(FilterError::InvalidOffset), "{bad}");
        }
        assert!(PageWindow::from_params(Some("1"), Some("0")).is_ok());
    }
}
