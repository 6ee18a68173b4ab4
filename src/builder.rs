use super::*;

/// Strategy producing a link that, when followed, sets or flips the
/// sort direction of one field.
pub trait UrlBuilder<T> {
    fn generate_from_request(
        &self,
        sorter: &Sorter<T>,
        request: &dyn SortRequest,
        field: &str,
        direction: Option<Direction>,
    ) -> Result<String>;
}

/// Query-string implementation: rewrites the request's query so that
/// all managed sort parameters are dropped and the target field's
/// direction is set (single-column links). Unrelated parameters are
/// preserved; the path component is kept as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParamUrlBuilder;

impl<T> UrlBuilder<T> for QueryParamUrlBuilder {
    fn generate_from_request(
        &self,
        sorter: &Sorter<T>,
        request: &dyn SortRequest,
        field: &str,
        direction: Option<Direction>,
    ) -> Result<String> {
        let field_path = sorter.path(field)?;

        let direction = match direction {
            Some(direction) => direction,
            // An unresolved sorter counts as "field not current".
            None => match sorter.current_sort() {
                Ok(sort) if sort.has(field_path) => sort.direction(field_path)?.flip(),
                _ => Direction::Asc,
            },
        };

        let (path, raw_query) = split_uri(request.uri());

        let managed = sorter
            .fields()
            .into_iter()
            .map(|name| sorter.param_key(name))
            .collect::<Vec<_>>();

        let mut pairs = form_urlencoded::parse(raw_query.as_bytes())
            .into_owned()
            .filter(|(key, _)| !managed.contains(key))
            .collect::<Vec<_>>();
        pairs.push((sorter.param_key(field), direction.to_string()));

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();

        trace!(%field, %direction, "generated sort link");
        Ok(format!("{}?{}", path, query))
    }
}
