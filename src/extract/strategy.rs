use scraper::ElementRef;

/// One way of pulling a field out of a review container
pub trait FieldStrategy<T>: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// `None` when this strategy finds nothing usable
    fn extract(&self, container: ElementRef<'_>) -> Option<T>;
}

/// Ordered fallback chain: strategies run left to right, first `Some` wins
pub struct Chain<T> {
    strategies: Vec<Box<dyn FieldStrategy<T>>>,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, strategy: impl FieldStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn push(&mut self, strategy: Box<dyn FieldStrategy<T>>) {
        self.strategies.push(strategy);
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn run(&self, container: ElementRef<'_>) -> Option<T> {
        self.strategies.iter().find_map(|s| {
            let value = s.extract(container);
            if value.is_some() {
                tracing::trace!("field matched by {}", s.name());
            }
            value
        })
    }
}
