/// Keyboard highlight over a displayed suggestion list.
///
/// Nothing is highlighted until the first arrow press; movement wraps at both
/// ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestionCursor {
    len: usize,
    selected: Option<usize>,
}

impl SuggestionCursor {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: None,
        }
    }

    /// New suggestions arrived; drop the highlight.
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    pub fn down(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.len,
            None => 0,
        });
    }

    pub fn up(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + self.len - 1) % self.len,
            None => self.len - 1,
        });
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The highlighted item of `items`, if any.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.selected.and_then(|i| items.get(i))
    }
}
