use crate::domain::Annotation;

/// The document with its redo stack and selection
#[derive(Clone, Debug, Default)]
pub struct AnnotationState {
    /// Paint order: later entries paint over earlier ones
    pub annotations: Vec<Annotation>,
    /// Annotations removed by undo, most recent last
    pub undone: Vec<Annotation>,
    selected: Option<usize>,
}

impl AnnotationState {
    /// Append an annotation and truncate the redo history
    ///
    /// Returns the index of the new annotation.
    pub fn add(&mut self, annotation: Annotation) -> usize {
        log::debug!("Adding {} annotation", annotation.kind());
        self.undone.clear();
        self.annotations.push(annotation);
        self.annotations.len() - 1
    }

    /// Remove the selected annotation unless a text edit is active
    ///
    /// Returns the removed annotation.
    pub fn delete_selected(&mut self, text_editing: bool) -> Option<Annotation> {
        if text_editing {
            return None;
        }
        let index = self.selected.take()?;
        if index >= self.annotations.len() {
            return None;
        }
        let removed = self.annotations.remove(index);
        log::debug!("Deleted {} annotation at {index}", removed.kind());
        self.undone.clear();
        Some(removed)
    }

    /// Remove an annotation without touching the redo history
    ///
    /// Used to drop annotations that never became visible, such as a text
    /// annotation whose edit ended empty.
    pub fn discard(&mut self, index: usize) -> Option<Annotation> {
        if index >= self.annotations.len() {
            return None;
        }
        self.selected = None;
        Some(self.annotations.remove(index))
    }

    pub fn undo(&mut self) {
        if let Some(annotation) = self.annotations.pop() {
            log::debug!("Undo {} annotation", annotation.kind());
            self.undone.push(annotation);
            self.selected = None;
        }
    }

    pub fn redo(&mut self) {
        if let Some(annotation) = self.undone.pop() {
            log::debug!("Redo {} annotation", annotation.kind());
            self.annotations.push(annotation);
            self.selected = None;
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select an annotation by index; out-of-range indices clear the selection
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.annotations.len());
    }

    pub fn selected_annotation_mut(&mut self) -> Option<&mut Annotation> {
        self.annotations.get_mut(self.selected?)
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Annotation> {
        self.annotations.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
