use super::*;

/// Configuration callback invoked once when a factory builds a
/// `Sorter`; registers fields, defaults and the prefix.
pub trait Definition<T> {
    fn build_sorter(&self, sorter: &mut Sorter<T>);
}

impl<T, F> Definition<T> for F
where
    F: Fn(&mut Sorter<T>),
{
    fn build_sorter(&self, sorter: &mut Sorter<T>) {
        self(sorter)
    }
}

type BoxedApplier<T> = Box<dyn SortApplier<T> + Send + Sync>;

/// Ordered applier registry; read-only after registration.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SorterFactory<T> {
    #[derivative(Debug = "ignore")]
    appliers: Vec<BoxedApplier<T>>,
}

impl<T> SorterFactory<T> {
    pub fn new(appliers: Vec<BoxedApplier<T>>) -> Self {
        Self { appliers }
    }

    pub fn register(&mut self, applier: impl SortApplier<T> + Send + Sync + 'static) {
        self.appliers.push(Box::new(applier));
    }

    pub fn create_sorter(
        self: &Arc<Self>,
        definition: Option<&dyn Definition<T>>,
    ) -> Sorter<T> {
        let mut sorter = Sorter::new(self.clone());
        if let Some(definition) = definition {
            definition.build_sorter(&mut sorter);
        }
        sorter
    }

    /// First registered applier supporting `data`; registration order is
    /// priority for overlapping predicates.
    pub fn applier(&self, data: &T) -> Result<&(dyn SortApplier<T> + Send + Sync)> {
        self.appliers
            .iter()
            .map(|applier| applier.as_ref())
            .find(|applier| applier.supports(data))
            .ok_or(SortError::NoApplierFound)
    }
}

impl<T> Default for SorterFactory<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
