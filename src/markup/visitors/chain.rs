//! Priority-ordered collection of formatter passes

use super::FormatterVisitor;

struct Entry {
    priority: i32,
    visitor: Box<dyn FormatterVisitor>,
}

/// Passes sorted by descending priority; equal priorities keep insertion order
#[derive(Default)]
pub struct VisitorChain {
    entries: Vec<Entry>,
}

impl VisitorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, visitor: Box<dyn FormatterVisitor>, priority: i32) {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, Entry { priority, visitor });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.visitor.name()).collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn FormatterVisitor>> {
        self.entries.iter_mut().map(|entry| &mut entry.visitor)
    }

    /// The lowest-priority pass, whose output is the formatter's result
    pub fn last(&self) -> Option<&dyn FormatterVisitor> {
        self.entries.last().map(|entry| entry.visitor.as_ref())
    }

    /// First pass of concrete type `T`
    pub fn find<T: FormatterVisitor>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|entry| entry.visitor.as_any().downcast_ref::<T>())
    }

    pub fn find_mut<T: FormatterVisitor>(&mut self) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find_map(|entry| entry.visitor.as_any_mut().downcast_mut::<T>())
    }
}

impl std::fmt::Debug for VisitorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| (entry.visitor.name(), entry.priority)))
            .finish()
    }
}
