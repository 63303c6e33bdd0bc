//! Markup registration surface of a rendered response.

use std::fmt;

use parking_lot::Mutex;

/// Where in the document registered markup is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Head,
    BodyBegin,
    BodyEnd,
}

/// Host view that accepts markup for the response being rendered.
///
/// Registration is keyed: registering the same key at the same position twice
/// within one response must keep only the first block and return `false`.
pub trait View: Send + Sync {
    fn register_markup(&self, key: &str, markup: String, position: Position) -> bool;
}

struct Block {
    key: String,
    position: Position,
    markup: String,
}

/// View that keeps registered blocks in memory, one instance per response.
#[derive(Default)]
pub struct InMemoryView {
    blocks: Mutex<Vec<Block>>,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup registered at `position`, in registration order.
    pub fn markup_at(&self, position: Position) -> Vec<String> {
        self.blocks
            .lock()
            .iter()
            .filter(|block| block.position == position)
            .map(|block| block.markup.clone())
            .collect()
    }

    /// Everything registered for the document head, concatenated.
    pub fn render_head(&self) -> String {
        self.markup_at(Position::Head).concat()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }
}

impl View for InMemoryView {
    fn register_markup(&self, key: &str, markup: String, position: Position) -> bool {
        let mut blocks = self.blocks.lock();
        if blocks
            .iter()
            .any(|block| block.key == key && block.position == position)
        {
            return false;
        }
        blocks.push(Block {
            key: key.to_owned(),
            position,
            markup,
        });
        true
    }
}

impl fmt::Debug for InMemoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryView")
            .field("blocks", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_by_key_and_position() {
        let view = InMemoryView::new();
        assert!(view.register_markup("a", "<script>1</script>".into(), Position::Head));
        assert!(!view.register_markup("a", "<script>2</script>".into(), Position::Head));
        assert!(view.register_markup("a", "<script>3</script>".into(), Position::BodyEnd));

        assert_eq!(view.render_head(), "<script>1</script>");
        assert_eq!(view.len(), 2);
    }
}
