use super::*;

/// Per-request orchestrator: maps user-facing field names to internal
/// paths, resolves a `Sort` from request input and delegates the actual
/// ordering to an applier from the factory.
///
/// One instance models one request's sort resolution; it is not meant
/// to be shared across requests.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Sorter<T> {
    #[derivative(Debug = "ignore")]
    factory: Arc<SorterFactory<T>>,
    fields: Vec<(String, String)>,
    defaults: Vec<(String, Direction)>,
    prefix: Option<String>,
    current_sort: Option<Sort>,
}

impl<T> Sorter<T> {
    pub fn new(factory: Arc<SorterFactory<T>>) -> Self {
        Self {
            factory,
            fields: Vec::new(),
            defaults: Vec::new(),
            prefix: None,
            current_sort: None,
        }
    }

    /// Registers a user-facing field name mapped to an internal path.
    /// Registration order defines the output order of `fields`;
    /// re-adding a name overwrites its path in place.
    pub fn add(&mut self, name: impl Into<String>, path: impl Into<String>) {
        let name = name.into();
        let path = path.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = path,
            None => self.fields.push((name, path)),
        }
    }

    /// Appends a fallback ordering rule, used only when no registered
    /// field matched the input.
    pub fn add_default(&mut self, path: impl Into<String>, direction: Direction) {
        self.defaults.push((path.into(), direction));
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn path(&self, name: &str) -> Result<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_str())
            .ok_or_else(|| SortError::UnknownField(name.to_owned()))
    }

    pub fn fields(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// The flat parameter key for a registered field name: `name`, or
    /// `prefix[name]` when a prefix namespaces the parameter space.
    pub fn param_key(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}[{}]", prefix, name),
            None => name.to_owned(),
        }
    }

    /// Resolves a fresh `Sort` from raw request parameters and makes it
    /// current. A field is selected when `input` holds its parameter
    /// key with a non-empty direction value; when nothing is selected
    /// the registered defaults apply instead. Idempotent for the same
    /// input and registration state.
    pub fn handle(&mut self, input: &HashMap<String, String>) {
        let mut sort = Sort::new();
        for (name, path) in &self.fields {
            let key = self.param_key(name);
            let value = match input.get(&key) {
                Some(value) if !value.is_empty() => value,
                _ => continue,
            };
            match value.parse::<Direction>() {
                Ok(direction) => sort.add(path.clone(), direction),
                Err(_) => {
                    warn!(%name, %value, "ignoring unparseable sort direction");
                }
            }
        }

        if sort.is_empty() {
            for (path, direction) in &self.defaults {
                sort.add(path.clone(), *direction);
            }
        }

        trace!(fields = sort.len(), "resolved sort");
        self.current_sort = Some(sort);
    }

    /// Pulls the registered fields' parameters out of the request's
    /// query string and delegates to `handle`.
    pub fn handle_request(&mut self, request: &dyn SortRequest) {
        let mut input = HashMap::new();
        for (name, _) in &self.fields {
            let key = self.param_key(name);
            if let Some(value) = request.get(&key) {
                input.insert(key, value.to_owned());
            }
        }
        self.handle(&input);
    }

    pub fn current_sort(&self) -> Result<&Sort> {
        self.current_sort.as_ref().ok_or(SortError::UnresolvedSort)
    }

    pub fn sort(&self, data: T) -> Result<T> {
        self.sort_with(data, &ApplyOptions::default())
    }

    /// Reorders `data` according to the current sort, delegating to the
    /// first applier from the factory that supports it. Takes `data`
    /// by value and returns the reordered value; `Sorter` state is
    /// never touched, so a failed call changes nothing visible.
    pub fn sort_with(&self, data: T, options: &ApplyOptions) -> Result<T> {
        let sort = self.current_sort()?;
        let applier = self.factory.applier(&data)?;
        applier.apply(sort, data, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sorter() -> Sorter<Value> {
        let factory = Arc::new(SorterFactory::new(vec![Box::new(ValueApplier)]));
        Sorter::new(factory)
    }

    fn input(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn takes_fields_into_account() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");

        assert_eq!(sorter.fields(), vec!["a", "b"]);
        assert_eq!(sorter.path("a").unwrap(), "[a]");
    }

    #[test]
    fn re_adding_a_name_overwrites_without_duplicating() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");
        sorter.add("a", "[a2]");

        assert_eq!(sorter.fields(), vec!["a", "b"]);
        assert_eq!(sorter.path("a").unwrap(), "[a2]");
    }

    #[test]
    fn path_fails_for_unregistered_name() {
        let sorter = sorter();
        let err = sorter.path("nope").unwrap_err();
        assert_eq!(err, SortError::UnknownField("nope".to_owned()));
    }

    #[test]
    fn handles_raw_input() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");

        sorter.handle(&input(&[("a", "ASC")]));

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.direction("[a]").unwrap(), Direction::Asc);
        assert!(!sort.has("[b]"));
    }

    #[test]
    fn uses_defaults_if_no_field_provided() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");
        sorter.add_default("[c]", Direction::Desc);

        sorter.handle(&HashMap::new());

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.direction("[c]").unwrap(), Direction::Desc);
    }

    #[test]
    fn uses_fields_if_provided() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");
        sorter.add_default("[c]", Direction::Desc);

        sorter.handle(&input(&[("a", "ASC")]));

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.direction("[a]").unwrap(), Direction::Asc);
        assert!(!sort.has("[c]"));
    }

    #[test]
    fn handles_multiple_defaults_in_order() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add_default("[c]", Direction::Desc);
        sorter.add_default("[d]", Direction::Asc);

        sorter.handle(&HashMap::new());

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.fields(), vec!["[c]", "[d]"]);
        assert_eq!(sort.direction("[c]").unwrap(), Direction::Desc);
        assert_eq!(sort.direction("[d]").unwrap(), Direction::Asc);
    }

    #[test]
    fn empty_values_do_not_select_a_field() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add_default("[c]", Direction::Desc);

        sorter.handle(&input(&[("a", "")]));

        let sort = sorter.current_sort().unwrap();
        assert!(!sort.has("[a]"));
        assert!(sort.has("[c]"));
    }

    #[test]
    fn unparseable_directions_are_ignored() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add_default("[c]", Direction::Desc);

        sorter.handle(&input(&[("a", "sideways")]));

        let sort = sorter.current_sort().unwrap();
        assert!(!sort.has("[a]"));
        assert!(sort.has("[c]"));
    }

    #[test]
    fn prefix_nests_parameter_keys() {
        let mut sorter = sorter();
        sorter.set_prefix("sort");
        sorter.add("a", "[a]");

        assert_eq!(sorter.param_key("a"), "sort[a]");

        sorter.handle(&input(&[("sort[a]", "DESC"), ("a", "ASC")]));

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.direction("[a]").unwrap(), Direction::Desc);
    }

    #[test]
    fn handle_is_idempotent() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");

        sorter.handle(&input(&[("a", "DESC")]));
        let first = sorter.current_sort().unwrap().clone();
        sorter.handle(&input(&[("a", "DESC")]));

        assert_eq!(*sorter.current_sort().unwrap(), first);
    }

    #[test]
    fn handle_replaces_the_previous_sort() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");

        sorter.handle(&input(&[("a", "ASC")]));
        sorter.handle(&input(&[("b", "DESC")]));

        let sort = sorter.current_sort().unwrap();
        assert!(!sort.has("[a]"));
        assert_eq!(sort.direction("[b]").unwrap(), Direction::Desc);
    }

    #[test]
    fn current_sort_fails_before_handle() {
        let sorter = sorter();
        assert_eq!(sorter.current_sort().unwrap_err(), SortError::UnresolvedSort);
    }

    #[test]
    fn handles_request() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");

        let request = RawRequest::new("/list?a=ASC&other=1");
        sorter.handle_request(&request);

        let sort = sorter.current_sort().unwrap();
        assert_eq!(sort.direction("[a]").unwrap(), Direction::Asc);
    }

    #[test]
    fn sorts_data_through_the_factory() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");

        sorter.handle(&input(&[("a", "DESC")]));

        let sorted = sorter
            .sort(json!([{"a": 123}, {"a": 456}, {"a": 789}]))
            .unwrap();
        assert_eq!(sorted, json!([{"a": 789}, {"a": 456}, {"a": 123}]));
    }

    #[test]
    fn sort_with_empty_current_sort_is_a_no_op() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.add("b", "[b]");

        sorter.handle(&HashMap::new());
        assert!(sorter.current_sort().unwrap().is_empty());

        let data = json!([{"a": 2}, {"a": 1}]);
        assert_eq!(sorter.sort(data.clone()).unwrap(), data);
    }

    #[test]
    fn sort_fails_without_a_supporting_applier() {
        let mut sorter = sorter();
        sorter.add("a", "[a]");
        sorter.handle(&input(&[("a", "ASC")]));

        let err = sorter.sort(json!(42)).unwrap_err();
        assert_eq!(err, SortError::NoApplierFound);
    }

    #[test]
    fn sort_fails_before_handle() {
        let sorter = sorter();
        let err = sorter.sort(json!([])).unwrap_err();
        assert_eq!(err, SortError::UnresolvedSort);
    }
}
