//! OData query shaping (`$top`, `$select`, `$orderby`)

use std::fmt;

use super::ApiSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("ASC"),
            SortDirection::Desc => f.write_str("DESC"),
        }
    }
}

/// Page size, projection and sort order for one collection request.
/// Field names are written in Graph (camelCase) spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub top: Option<u32>,
    pub select: Vec<String>,
    pub order_by: Option<(String, SortDirection)>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Query-string pairs for the given surface
    pub fn to_params(&self, surface: ApiSurface) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if !self.select.is_empty() {
            let fields: Vec<String> = self.select.iter().map(|f| surface.field(f)).collect();
            params.push(("$select", fields.join(",")));
        }
        if let Some((field, direction)) = &self.order_by {
            params.push(("$orderby", format!("{} {}", surface.field(field), direction)));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_query_params() {
        let query = QuerySpec::new()
            .top(10)
            .select(["receivedDateTime", "subject", "from"])
            .order_by("receivedDateTime", SortDirection::Desc);

        assert_eq!(
            query.to_params(ApiSurface::Graph),
            vec![
                ("$top", "10".to_string()),
                ("$select", "receivedDateTime,subject,from".to_string()),
                ("$orderby", "receivedDateTime DESC".to_string()),
            ]
        );
        assert_eq!(
            query.to_params(ApiSurface::Outlook)[1],
            ("$select", "ReceivedDateTime,Subject,From".to_string())
        );
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(QuerySpec::new().to_params(ApiSurface::Graph).is_empty());
    }
}
